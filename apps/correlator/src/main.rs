// [apps/correlator/src/main.rs]
/*!
 * =================================================================
 * APARATO: CORRELATOR SHELL (V1.0)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: ORQUESTACIÓN DE ARGUMENTOS Y DISPARO DEL MOTOR DE
 * CORRELACIÓN
 *
 * Lee un feed de alertas en JSON-lines, despacha cada una contra el
 * motor de correlación y escribe los hallazgos consolidados en
 * JSON-lines. El snapshot del estado se persiste al cierre de cada
 * ciclo y, en modo producción, también de forma periódica.
 * =================================================================
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use aegis_chain_client::{ChainClient, JsonRpcChainClient, StubChainClient};
use aegis_correlation_engine::{BotRegistry, CorrelationEngine, EngineConfig};
use aegis_domain_models::AlertEvent;
use aegis_label_client::{HttpLabelClient, LabelClient, StubLabelClient};
use aegis_state_store::FileBlobStore;

/// Argumentos de línea de comandos del motor de correlación.
#[derive(Parser, Debug)]
#[command(
    author = "Aegis Correlator Team",
    version = "1.0",
    about = "Consolida alertas de detectores upstream en hallazgos de ataque multi-etapa."
)]
struct CommandArguments {
    /// Ruta del archivo JSON-lines con el feed de alertas de entrada.
    #[arg(short, long, value_name = "FILE_PATH")]
    input_alerts: PathBuf,

    /// Ruta del archivo JSON-lines donde se escriben los hallazgos.
    #[arg(short, long, value_name = "FILE_PATH", default_value = "findings.jsonl")]
    output_findings: PathBuf,

    /// Directorio donde el motor persiste su snapshot de estado.
    #[arg(long, default_value = "dist/state", env = "AEGIS_SNAPSHOT_DIR")]
    snapshot_dir: PathBuf,

    /// Chain id que este despliegue del motor vigila.
    #[arg(long, default_value_t = 1, env = "AEGIS_CHAIN_ID")]
    chain_id: u64,

    /// Modo producción: desactiva la persistencia síncrona por alerta en
    /// favor de un temporizador de fondo.
    #[arg(long, env = "AEGIS_PRODUCTION")]
    production: bool,

    /// Intervalo (segundos) del snapshot periódico en modo producción.
    #[arg(long, default_value_t = 60)]
    snapshot_interval_seconds: u64,

    /// URL JSON-RPC de la cadena a consultar para el cliente on-chain.
    /// Si se omite, se usa un cliente determinista sin red (solo apto
    /// para pruebas locales).
    #[arg(long, env = "AEGIS_CHAIN_RPC_URL")]
    chain_rpc_url: Option<String>,

    /// URL base del servicio de etiquetas de reputación. Si se omite, se
    /// usa un cliente determinista sin red.
    #[arg(long, env = "AEGIS_LABEL_SERVICE_URL")]
    label_service_url: Option<String>,
}

#[instrument(skip(engine, args))]
async fn run_feed(engine: &CorrelationEngine, args: &CommandArguments) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.input_alerts)
        .await
        .with_context(|| format!("reading alert feed at {:?}", args.input_alerts))?;

    let mut output = tokio::fs::File::create(&args.output_findings)
        .await
        .with_context(|| format!("creating findings sink at {:?}", args.output_findings))?;

    let mut processed = 0usize;
    let mut emitted = 0usize;

    for (line_number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let alert: AlertEvent = match serde_json::from_str(line) {
            Ok(alert) => alert,
            Err(e) => {
                warn!(line_number, "skipping undecodable alert: {e}");
                continue;
            }
        };

        match engine.handle(&alert).await {
            Ok(findings) => {
                for finding in &findings {
                    let mut serialized = serde_json::to_vec(finding)?;
                    serialized.push(b'\n');
                    output.write_all(&serialized).await?;
                    emitted += 1;
                }
            }
            Err(e) => {
                warn!(alert_hash = %alert.alert_hash, "rejected alert: {e}");
            }
        }
        processed += 1;
    }

    output.flush().await?;
    info!(processed, emitted, "feed exhausted");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli_configuration = CommandArguments::parse();
    info!("Initializing correlation engine for chain {}...", cli_configuration.chain_id);

    let config = EngineConfig::new(cli_configuration.chain_id, cli_configuration.production);
    let registry = BotRegistry::default_registry();

    let chain_client: Arc<dyn ChainClient> = match &cli_configuration.chain_rpc_url {
        Some(url) => Arc::new(JsonRpcChainClient::new(url.clone())),
        None => {
            warn!("no --chain-rpc-url given, falling back to a no-network chain client");
            Arc::new(StubChainClient::new())
        }
    };

    let label_client: Arc<dyn LabelClient> = match &cli_configuration.label_service_url {
        Some(url) => Arc::new(HttpLabelClient::new(url.clone())),
        None => {
            warn!("no --label-service-url given, falling back to a no-network label client");
            Arc::new(StubLabelClient::new())
        }
    };

    let blob_store = Arc::new(FileBlobStore::new(cli_configuration.snapshot_dir.clone()));

    let engine = Arc::new(
        CorrelationEngine::initialize(config, registry, chain_client, label_client, blob_store)
            .await
            .context("engine configuration rejected at startup")?,
    );

    let ticker = cli_configuration.production.then(|| {
        let engine = Arc::clone(&engine);
        let interval_seconds = cli_configuration.snapshot_interval_seconds;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds));
            loop {
                ticker.tick().await;
                engine.persist_snapshot().await;
                info!("periodic snapshot persisted");
            }
        })
    });

    run_feed(&engine, &cli_configuration).await?;

    if let Some(handle) = ticker {
        handle.abort();
    }

    engine.persist_snapshot().await;
    info!("final state snapshot persisted, shutting down");

    Ok(())
}
