//! command line surface
use {crate::config::Settings, clap::Parser, std::path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about = "Bulk rename/move tool for Panopto folder trees")]
pub struct Cli {
    /// Server name as FQDN, e.g. demo.hosted.panopto.com
    #[arg(long)]
    pub server: String,

    /// Client ID of the OAuth2 client
    #[arg(long)]
    pub client_id: String,

    /// Client secret of the OAuth2 client
    #[arg(long, env = "PANOPROV_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Skip TLS certificate verification (never apply to production)
    #[arg(long)]
    pub skip_verify: bool,

    /// Input mapping CSV, header `oldName,newName`
    #[arg(long, value_name = "PATH")]
    pub input_csv: Option<PathBuf>,

    /// Where the run report is written
    #[arg(long, value_name = "PATH")]
    pub results_csv: Option<PathBuf>,

    /// Ask for confirmation before mutating each row
    #[arg(long)]
    pub double_verify: bool,
}

impl Cli {
    /// site base URL the service lives under
    pub fn site_base(&self) -> String {
        format!("https://{}", self.server)
    }

    /// Fold the flags over the file/env settings. Flags win where given.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(path) = &self.input_csv {
            settings.input_csv = path.clone();
        }
        if let Some(path) = &self.results_csv {
            settings.results_csv = path.clone();
        }
        if self.double_verify {
            settings.double_verify = true;
        }
    }
}
