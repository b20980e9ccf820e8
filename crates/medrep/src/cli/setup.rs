use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use medrepapp::model::{Field, SearchColumn, Weekday};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "medrep",
    bin_name = "medrep",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Enable shell completions:\n  eval \"$(medrep completions bash)\"  # add to ~/.bashrc\n  eval \"$(medrep completions zsh)\"   # add to ~/.zshrc"
)]
#[command(about = "Doctor contact and call scheduling records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Root URL of the doctors API (overrides config and MEDREP_BASE_URL)
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub base_url: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputMode::Text, help_heading = "Options")]
    pub output: OutputMode,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Records(RecordCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

/// Commands that talk to the doctors API.
#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// List doctors, optionally filtered
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Column to search: name, code, registration, tax-id
        #[arg(long = "by", value_name = "COL")]
        by: Option<SearchColumn>,

        /// Text the column must contain (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show every field of one doctor
    #[command(alias = "v", display_order = 2)]
    View {
        /// Record id
        id: String,
    },

    /// Add a doctor
    #[command(alias = "n", display_order = 3)]
    Add {
        #[command(flatten)]
        fields: FieldArgs,

        /// Add a call day; days already listed are kept (repeatable)
        #[arg(long = "day", value_name = "DAY")]
        days: Vec<Weekday>,
    },

    /// Edit a doctor; only the given fields change
    #[command(alias = "e", display_order = 4)]
    Edit {
        /// Record id
        id: String,

        #[command(flatten)]
        fields: FieldArgs,

        /// Toggle a call day on or off (repeatable)
        #[arg(long = "toggle-day", value_name = "DAY")]
        toggle_days: Vec<Weekday>,
    },

    /// Delete a doctor
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// Record id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Local commands; no network.
#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Show the resolved configuration or print a template
    #[command(display_order = 20)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Print a shell completion script
    #[command(display_order = 21)]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the resolved settings
    Show,
    /// Print a commented TOML template
    Gen,
}

/// One flag per record field. Absent flags leave the field alone.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Doctor name
    #[arg(long)]
    pub name: Option<String>,

    /// Doctor code
    #[arg(long)]
    pub code: Option<String>,

    #[arg(long)]
    pub mobile: Option<String>,

    /// FFR MSL number
    #[arg(long = "registration-no", alias = "ffrmslno")]
    pub registration_no: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// PAN (tax id)
    #[arg(long)]
    pub pan: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub dob: Option<String>,

    /// Call days as a comma-separated list, replacing the current ones
    #[arg(long = "call-days", value_name = "DAYS")]
    pub call_days: Option<String>,

    /// Call time, HH:MM
    #[arg(long = "call-time", value_name = "TIME")]
    pub call_time: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub chemist: Option<String>,

    /// Medical registration
    #[arg(long = "med-reg")]
    pub med_reg: Option<String>,

    /// Visiting / prescription flag
    #[arg(long = "visiting-rx")]
    pub visiting_rx: Option<String>,

    /// Status, e.g. Active or Inactive
    #[arg(long)]
    pub status: Option<String>,
}

impl FieldArgs {
    /// The fields given on the command line, in form order.
    pub fn assignments(&self) -> Vec<(Field, &str)> {
        [
            (Field::Name, &self.name),
            (Field::Code, &self.code),
            (Field::Mobile, &self.mobile),
            (Field::RegistrationNo, &self.registration_no),
            (Field::Email, &self.email),
            (Field::TaxId, &self.pan),
            (Field::Address, &self.address),
            (Field::DateOfBirth, &self.dob),
            (Field::CallDay, &self.call_days),
            (Field::CallTime, &self.call_time),
            (Field::Notes, &self.notes),
            (Field::ChemistDetails, &self.chemist),
            (Field::MedicalRegistration, &self.med_reg),
            (Field::VisitingRx, &self.visiting_rx),
            (Field::Status, &self.status),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Builds the clap Command, for completion scripts.
pub fn build_command() -> clap::Command {
    Cli::command()
}
