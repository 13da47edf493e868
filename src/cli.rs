//! Interface de linha de comando do worker baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, once, status)
//! e flags globais (--config, --queue-url, --verbose).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Worker de fila que executa jobs HTTP com roteamento de failover.
#[derive(Debug, Parser)]
#[command(name = "queue-worker", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./worker.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// URL base do serviço de fila; sobrescreve o arquivo e o ambiente.
    #[arg(long, global = true)]
    pub queue_url: Option<String>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Processa jobs continuamente até receber Ctrl-C.
    Run,

    /// Executa uma única iteração do loop e sai.
    Once,

    /// Lista os jobs da fila e quais estão elegíveis.
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_run_subcommand() {
        let cli = Cli::parse_from(["queue-worker", "run"]);
        assert!(matches!(cli.command, Command::Run));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "queue-worker",
            "--config",
            "/etc/worker.toml",
            "--queue-url",
            "http://queue:9000",
            "-v",
            "status",
        ]);
        assert!(matches!(cli.command, Command::Status));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/worker.toml")));
        assert_eq!(cli.queue_url.as_deref(), Some("http://queue:9000"));
        assert!(cli.verbose);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["queue-worker", "once", "--verbose"]);
        assert!(matches!(cli.command, Command::Once));
        assert!(cli.verbose);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
