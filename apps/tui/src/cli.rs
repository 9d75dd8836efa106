use clap::Parser;

#[derive(Debug, Default, Parser)]
#[command(name = "parajes", version, about = "Parajes census review console")]
pub struct CliArgs {
    /// Print the KPI report and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    pub api: Option<String>,

    /// Start filtered to this departamento
    #[arg(long, value_name = "NAME")]
    pub depto: Option<String>,
}
