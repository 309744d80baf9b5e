pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "roster")]
#[command(about = "Maintain a roster of student records stored as JSON")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = toml_config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Roster JSON file (overrides storage.data_file)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output (takes precedence over logging.level)")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print every record with its index
    List,
    /// Append a record
    Add(RecordArgs),
    /// Replace the record at INDEX
    Update {
        index: usize,
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Delete the record at INDEX
    Remove { index: usize },
    /// Print records matching all given conditions
    Filter {
        #[arg(long)]
        course: Option<i32>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Append records from a CSV file
    Import { path: PathBuf },
    /// Write the roster to a CSV file
    Export { path: PathBuf },
    /// Save the roster to another JSON file
    SaveAs { path: PathBuf },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct RecordArgs {
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub middle_name: String,
    #[arg(long)]
    pub course: i32,
    #[arg(long)]
    pub group: String,
    /// Birth date as dd.MM.yyyy
    #[arg(long)]
    pub birth_date: String,
    #[arg(long)]
    pub email: String,
}

#[cfg(feature = "cli")]
impl Command {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Add(_) | Command::Update { .. } | Command::Remove { .. } | Command::Import { .. }
        )
    }
}

#[cfg(feature = "cli")]
impl RecordArgs {
    /// 依欄位順序建立記錄，日期格式同 CSV 匯入
    pub fn to_record(&self) -> crate::Result<crate::StudentRecord> {
        let birth_date = crate::core::csv_codec::parse_date(&self.birth_date).ok_or_else(|| {
            crate::RosterError::Parse {
                line: 0,
                field: "birth_date".to_string(),
                value: self.birth_date.clone(),
                reason: "expected a date like dd.MM.yyyy".to_string(),
            }
        })?;

        crate::StudentRecord::try_new(
            self.last_name.as_str(),
            self.first_name.as_str(),
            self.middle_name.as_str(),
            self.course,
            self.group.as_str(),
            birth_date,
            &self.email,
        )
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("roster").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_add_command() {
        let cli = parse(&[
            "--data",
            "group.json",
            "add",
            "--last-name",
            "Иванов",
            "--first-name",
            "Иван",
            "--middle-name",
            "Иванович",
            "--course",
            "2",
            "--group",
            "Г-21",
            "--birth-date",
            "01.05.2002",
            "--email",
            "ivan@gmail.com",
        ]);

        assert_eq!(cli.data, Some(PathBuf::from("group.json")));
        assert_eq!(cli.config, PathBuf::from(toml_config::DEFAULT_CONFIG_FILE));
        assert!(cli.command.is_mutating());

        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        let record = args.to_record().unwrap();
        assert_eq!(record.last_name, "Иванов");
        assert_eq!(record.email(), "ivan@gmail.com");
    }

    #[test]
    fn test_parse_filter_and_remove() {
        let cli = parse(&["filter", "--course", "3", "--last-name", "Ив"]);
        assert!(!cli.command.is_mutating());
        match cli.command {
            Command::Filter {
                course,
                group,
                last_name,
            } => {
                assert_eq!(course, Some(3));
                assert_eq!(group, None);
                assert_eq!(last_name.as_deref(), Some("Ив"));
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = parse(&["-v", "remove", "4"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Remove { index: 4 }));
    }

    #[test]
    fn test_record_args_with_bad_date() {
        let args = RecordArgs {
            last_name: "Иванов".to_string(),
            first_name: "Иван".to_string(),
            middle_name: "Иванович".to_string(),
            course: 2,
            group: "Г-21".to_string(),
            birth_date: "2002/13/40".to_string(),
            email: "ivan@gmail.com".to_string(),
        };
        assert!(matches!(
            args.to_record(),
            Err(crate::RosterError::Parse { .. })
        ));
    }
}
