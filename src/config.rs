//! Configuração do worker carregada a partir de `worker.toml`.
//!
//! A struct [`WorkerConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `QUEUE_SERVICE_URL` tem precedência sobre o arquivo.

use anyhow::{Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Nome do arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "worker.toml";

/// Formato da saída de log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuração de nível superior carregada de `worker.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// URL base do serviço de fila.
    #[serde(default = "default_queue_url")]
    pub queue_url: String,

    /// Máximo de tentativas para jobs `crashed`/`failover` continuarem elegíveis.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Espera fixa em milissegundos após uma falha da fila.
    #[serde(default = "default_queue_retry_ms")]
    pub queue_retry_ms: u64,

    /// Espera em milissegundos antes de disparar a ação de failover.
    #[serde(default = "default_failover_cooldown_ms")]
    pub failover_cooldown_ms: u64,

    /// Limite inferior do atraso aleatório quando não há jobs.
    #[serde(default = "default_idle_delay_min_ms")]
    pub idle_delay_min_ms: u64,

    /// Limite superior do atraso aleatório quando não há jobs.
    #[serde(default = "default_idle_delay_max_ms")]
    pub idle_delay_max_ms: u64,

    /// Timeout de cada requisição HTTP de saída.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Nome lógico do target → URL base.
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

fn default_queue_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_queue_retry_ms() -> u64 {
    1000
}

fn default_failover_cooldown_ms() -> u64 {
    1000
}

fn default_idle_delay_min_ms() -> u64 {
    500
}

fn default_idle_delay_max_ms() -> u64 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_url: default_queue_url(),
            max_attempts: default_max_attempts(),
            queue_retry_ms: default_queue_retry_ms(),
            failover_cooldown_ms: default_failover_cooldown_ms(),
            idle_delay_min_ms: default_idle_delay_min_ms(),
            idle_delay_max_ms: default_idle_delay_max_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            log_format: LogFormat::default(),
            targets: HashMap::new(),
        }
    }
}

impl WorkerConfig {
    /// Carrega a configuração de `worker.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<WorkerConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo para a URL da fila.
        if let Ok(url) = std::env::var("QUEUE_SERVICE_URL") {
            if !url.is_empty() {
                config.queue_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_url.trim().is_empty() {
            bail!("queue_url must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        if self.idle_delay_min_ms > self.idle_delay_max_ms {
            bail!(
                "idle_delay_min_ms ({}) is greater than idle_delay_max_ms ({})",
                self.idle_delay_min_ms,
                self.idle_delay_max_ms
            );
        }
        Ok(())
    }
}
