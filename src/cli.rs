use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use formsmith::FieldType;

pub const DEFAULT_DRAFT_FILE: &str = ".formsmith/draft.json";

/// formsmith - build, store and fill typed forms
#[derive(Parser, Debug)]
#[command(name = "formsmith")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Machine-readable output (NDJSON events for `fill`)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct DraftFile {
    /// Draft file to work on
    #[arg(long = "file", short = 'f', default_value = DEFAULT_DRAFT_FILE)]
    pub path: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and edit the local draft
    Draft {
        #[command(flatten)]
        file: DraftFile,

        #[command(subcommand)]
        action: DraftAction,
    },

    /// Check the draft's structure and expressions
    Check {
        #[command(flatten)]
        file: DraftFile,
    },

    /// Persist the draft (first save assigns an id)
    Save {
        #[command(flatten)]
        file: DraftFile,
    },

    /// List saved forms
    List,

    /// Print a saved form as JSON
    Show {
        /// Form id
        id: String,
    },

    /// Fill in a saved form and submit it
    Fill {
        /// Form id (defaults to the most recently saved form)
        id: Option<String>,

        /// Field values to enter, in order (`field_id=value`)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Also revalidate derived fields whose value changed
        #[arg(long)]
        revalidate_derived: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DraftAction {
    /// Start a new draft
    New {
        /// Form name
        name: String,

        /// Replace an existing draft file
        #[arg(long)]
        force: bool,
    },

    /// Append a field
    Add {
        #[arg(value_enum)]
        field_type: FieldType,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        required: bool,
    },

    /// Change attributes of a field
    Update(UpdateArgs),

    /// Remove a field and references to it
    Remove {
        /// Field id
        id: String,
    },

    /// Move a field to another position
    Move {
        from: usize,
        to: usize,
    },

    /// Rename the form
    Rename {
        name: String,
    },

    /// Print the draft
    Show,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Field id
    pub id: String,

    #[arg(long)]
    pub label: Option<String>,

    #[arg(long = "type", value_enum)]
    pub field_type: Option<FieldType>,

    #[arg(long)]
    pub required: Option<bool>,

    /// Default value, interpreted for the field's type
    #[arg(long, conflicts_with = "clear_default")]
    pub default: Option<String>,

    #[arg(long)]
    pub clear_default: bool,

    /// Options for select/radio fields
    #[arg(long, value_delimiter = ',')]
    pub options: Option<Vec<String>>,

    /// Value must not be empty
    #[arg(long)]
    pub not_empty: bool,

    #[arg(long)]
    pub min_length: Option<usize>,

    #[arg(long)]
    pub max_length: Option<usize>,

    /// Value must look like an email address
    #[arg(long)]
    pub email: bool,

    /// Value must be a password of 8+ chars with a digit
    #[arg(long)]
    pub password: bool,

    /// Drop all validation rules
    #[arg(long, conflicts_with_all = ["not_empty", "min_length", "max_length", "email", "password"])]
    pub no_validation: bool,

    /// Parent fields the expression reads
    #[arg(long, value_delimiter = ',', requires = "expression")]
    pub derive_from: Option<Vec<String>>,

    /// Expression computing the field
    #[arg(long)]
    pub expression: Option<String>,

    /// Turn derivation off
    #[arg(long, conflicts_with_all = ["derive_from", "expression"])]
    pub no_derive: bool,
}
