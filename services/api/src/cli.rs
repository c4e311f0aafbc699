use crate::demo::{run_demo, DemoArgs};
use crate::score::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use promotion_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Promotion Desk",
    about = "Run and demonstrate the academic promotion service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through a full promotion review against an in-memory store
    Demo(DemoArgs),
    /// Score an activity spreadsheet against the default criteria for a title
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Score(args) => run_score(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promotion_desk::workflows::promotion::AcademicTitle;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["promotion-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_parses_title_codes() {
        let cli = Cli::try_parse_from([
            "promotion-api",
            "score",
            "--activities",
            "dossier.csv",
            "--title",
            "associate professor",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.title, AcademicTitle::AssociateProfessor);
                assert_eq!(args.activities.to_str(), Some("dossier.csv"));
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn score_rejects_unknown_titles() {
        let result = Cli::try_parse_from([
            "promotion-api",
            "score",
            "--activities",
            "dossier.csv",
            "--title",
            "emeritus",
        ]);
        assert!(result.is_err());
    }
}
