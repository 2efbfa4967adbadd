use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::schedule::AppointmentId;

#[derive(Parser, Debug)]
#[command(name = "interview-scheduler", version, about = "Book interview slots across the week")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the scheduler API over HTTP
    Serve(ServeArgs),
    /// Print every day with its slots and spots remaining
    Show(ClientArgs),
    /// Book an empty appointment
    Book(BookArgs),
    /// Change the student or interviewer of a booked appointment
    Edit(EditArgs),
    /// Cancel a booked appointment
    Cancel(CancelArgs),
    /// Write the week's bookings to a CSV file
    Export(ExportArgs),
    /// Re-seed the server's store
    Reset(ClientArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "SCHEDULER_BIND", default_value = "127.0.0.1")]
    pub bind: String,
    #[arg(long, env = "SCHEDULER_PORT", default_value_t = 8001)]
    pub port: u16,
    /// Bookings CSV (`day,time,student,interviewer`) applied to an empty week instead of the default fixture
    #[arg(long, env = "SCHEDULER_SEED_CSV")]
    pub seed: Option<PathBuf>,
    #[arg(long)]
    pub workers: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    #[arg(long, env = "SCHEDULER_API_URL", default_value = "http://127.0.0.1:8001")]
    pub api_url: String,
    #[arg(long, env = "SCHEDULER_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl ClientArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    pub appointment: AppointmentId,
    #[arg(long)]
    pub student: String,
    /// Interviewer name, matched case-insensitively
    #[arg(long)]
    pub interviewer: String,
}

/// Omitted fields keep the current booking's values
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    pub appointment: AppointmentId,
    #[arg(long)]
    pub student: Option<String>,
    #[arg(long)]
    pub interviewer: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CancelArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    pub appointment: AppointmentId,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    #[arg(short, long, default_value = "schedule.csv")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn book_takes_appointment_student_and_interviewer() {
        let cli = Cli::try_parse_from([
            "interview-scheduler",
            "book",
            "1",
            "--student",
            "Lydia Miller-Jones",
            "--interviewer",
            "sylvia palmer",
            "--api-url",
            "http://localhost:9000",
        ])
        .unwrap();
        let Command::Book(args) = cli.command else {
            panic!("expected book, got {:?}", cli.command);
        };
        assert_eq!(args.appointment, 1);
        assert_eq!(args.student, "Lydia Miller-Jones");
        assert_eq!(args.interviewer, "sylvia palmer");
        assert_eq!(args.client.api_url, "http://localhost:9000");
    }

    #[test]
    fn edit_fields_are_optional() {
        let cli = Cli::try_parse_from(["interview-scheduler", "edit", "2", "--student", "Archie"]).unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit, got {:?}", cli.command);
        };
        assert_eq!(args.student.as_deref(), Some("Archie"));
        assert!(args.interviewer.is_none());
    }

    #[test]
    fn book_requires_a_student() {
        assert!(Cli::try_parse_from(["interview-scheduler", "book", "1", "--interviewer", "Sven Jones"]).is_err());
    }

    #[test]
    fn export_output_has_a_default() {
        let cli = Cli::try_parse_from(["interview-scheduler", "export"]).unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export, got {:?}", cli.command);
        };
        assert_eq!(args.output, PathBuf::from("schedule.csv"));
    }
}
