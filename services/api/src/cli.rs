use crate::report::{run_positions, run_rank, PositionsArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_mcdm::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent MCDM",
    about = "Rank candidates for a job position with VIKOR and ELECTRE",
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
    /// Rank the candidates in a dataset export against one job position
    Rank(RankArgs),
    /// List the job positions available for ranking
    Positions(PositionsArgs),
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
        Command::Rank(args) => run_rank(args),
        Command::Positions(args) => run_positions(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MethodArg;
    use talent_mcdm::workflows::selection::DiscordanceRule;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["talent-mcdm-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_arguments_parse() {
        let cli = Cli::try_parse_from([
            "talent-mcdm-api",
            "rank",
            "--position",
            "IT Developer",
            "--method",
            "vikor",
            "--weights",
            "0.2,0.2,0.2,0.2,0.2",
            "--v",
            "0.3",
            "--discordance",
            "at_least",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.position, "IT Developer");
                assert_eq!(args.method, MethodArg::Vikor);
                assert_eq!(args.weights.map(|w| w.as_array()), Some([0.2; 5]));
                assert_eq!(args.v, Some(0.3));
                assert_eq!(args.discordance, Some(DiscordanceRule::AtLeastThreshold));
                assert!(args.json);
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn rank_rejects_malformed_weights() {
        let result = Cli::try_parse_from([
            "talent-mcdm-api",
            "rank",
            "--position",
            "Admin",
            "--weights",
            "0.5,0.5",
        ]);
        assert!(result.is_err());
    }
}
