//! `buildvariant resolve`, `matrix` and `flavors` commands.

use anyhow::{Context, Result};
use buildvariant_core::models::{BuildDescriptor, BuildDescriptorResponse, Flavor, SigningConfig};
use buildvariant_core::{ProjectConfig, Resolver};

use crate::output::{Table, or_dash, print_key_value, print_section, yes_no};

/// Prints a single resolved variant.
pub fn resolve(config: ProjectConfig, flavor: &str, build_type: &str, json: bool) -> Result<()> {
    let resolver = Resolver::from_project(config).context("Failed to load signing credentials")?;
    let descriptor = resolver
        .descriptor(flavor, build_type)
        .with_context(|| format!("Failed to resolve variant {} × {}", flavor, build_type))?;

    if json {
        let response = BuildDescriptorResponse::from(&descriptor);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_descriptor(&descriptor);
    }

    Ok(())
}

/// Prints every variant of the flavor × build type matrix.
pub fn matrix(config: ProjectConfig, json: bool) -> Result<()> {
    let resolver = Resolver::from_project(config).context("Failed to load signing credentials")?;
    let descriptors = resolver.all().context("Failed to resolve build variants")?;

    if json {
        let responses: Vec<BuildDescriptorResponse> =
            descriptors.iter().map(BuildDescriptorResponse::from).collect();
        println!("{}", serde_json::to_string_pretty(&responses)?);
        return Ok(());
    }

    let table = Table::new([
        ("VARIANT", 16),
        ("APPLICATION ID", 28),
        ("APP NAME", 18),
        ("SIGNING", 8),
        ("MINIFY", 6),
    ]);
    for descriptor in &descriptors {
        table.row([
            descriptor.name.as_str(),
            descriptor.application_id(),
            descriptor.display_name(),
            signing_label(descriptor.signing()),
            yes_no(descriptor.minify()),
        ]);
    }

    Ok(())
}

/// Lists the flavors with their resolved identity.
pub fn flavors(config: &ProjectConfig) -> Result<()> {
    let resolver = Resolver::new(config.clone(), Default::default());

    let table = Table::new([("FLAVOR", 10), ("APPLICATION ID", 28), ("APP NAME", 18)]);
    for flavor in Flavor::ALL {
        let spec = resolver.flavor(flavor.as_str())?;
        table.row([
            flavor.as_str(),
            spec.application_id.as_str(),
            spec.display_name.as_str(),
        ]);
    }

    Ok(())
}

fn print_descriptor(descriptor: &BuildDescriptor) {
    print_key_value("Variant", &descriptor.name);
    print_key_value("Flavor", descriptor.flavor.flavor.as_str());
    print_key_value("Build type", descriptor.build_type.build_type.as_str());
    print_key_value("Application ID", descriptor.application_id());
    print_key_value("App name", descriptor.display_name());
    print_key_value("Namespace", &descriptor.namespace);
    print_key_value("Minify", yes_no(descriptor.minify()));
    print_key_value("Shrink resources", yes_no(descriptor.shrink_resources()));
    print_key_value("Debuggable", yes_no(descriptor.build_type.debuggable));
    print_key_value("JVM target", &descriptor.jvm_target);

    print_section("Signing");
    match descriptor.signing() {
        SigningConfig::Debug => {
            print_key_value("Config", "debug (SDK debug keystore)");
        }
        SigningConfig::Release(creds) => {
            let store_file = creds.store_file.as_ref().map(|p| p.display().to_string());
            print_key_value("Config", "release (key.properties)");
            print_key_value("Key alias", or_dash(creds.key_alias.as_deref()));
            print_key_value("Store file", or_dash(store_file.as_deref()));
            print_key_value("Store password", if creds.store_password.is_some() { "set" } else { "-" });
            print_key_value("Key password", if creds.key_password.is_some() { "set" } else { "-" });
        }
    }

    let toolchain = &descriptor.toolchain;
    print_section("Toolchain");
    print_key_value("compileSdk", or_dash(toolchain.compile_sdk.as_deref()));
    print_key_value("minSdk", or_dash(toolchain.min_sdk.as_deref()));
    print_key_value("targetSdk", or_dash(toolchain.target_sdk.as_deref()));
    print_key_value("ndkVersion", or_dash(toolchain.ndk_version.as_deref()));
    print_key_value("versionCode", or_dash(toolchain.version_code.as_deref()));
    print_key_value("versionName", or_dash(toolchain.version_name.as_deref()));
}

fn signing_label(signing: &SigningConfig) -> &'static str {
    match signing {
        SigningConfig::Debug => "debug",
        SigningConfig::Release(creds) if creds.is_complete() => "release",
        SigningConfig::Release(_) => "partial",
    }
}
