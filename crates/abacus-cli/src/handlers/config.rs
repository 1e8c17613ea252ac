//! Config command handler

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use crate::ConfigArgs;

/// YAML for the configuration the command should show
pub fn render_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<String> {
    if args.defaults {
        CliConfig::new().to_yaml()
    } else {
        config.to_yaml()
    }
}

/// Execute the config command
pub fn execute_config(config: &CliConfig, args: &ConfigArgs, reporter: &Reporter) -> CliResult<()> {
    let yaml = render_config(config, args)?;
    reporter.result(yaml.trim_end());
    Ok(())
}
