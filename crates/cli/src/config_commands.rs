use {
    anyhow::Result,
    skillsync_config::{SkillsyncConfig, validate},
};

/// Print the resolved configuration and any validation diagnostics.
pub fn handle_config(config: &SkillsyncConfig) -> Result<bool> {
    match skillsync_config::find_config_file() {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# no config file found, showing defaults"),
    }
    println!("# target dir: {}", skillsync_config::target_dir(config).display());
    println!("{}", toml::to_string_pretty(config)?);

    let result = validate::validate(config);
    for diag in &result.diagnostics {
        eprintln!("{}: {}: {}", diag.severity, diag.path, diag.message);
    }
    Ok(!result.has_errors())
}
