// INICIO DEL ARCHIVO [libs/domain/correlation-engine/src/lib.rs]
/*!
 * =================================================================
 * APARATO: MOTOR DE CORRELACIÓN (V1.0)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L3)
 * RESPONSABILIDAD: CLUSTERING DE IDENTIDAD, ACUMULACIÓN DE EVIDENCIA
 * POR ETAPA, Y POLÍTICA DE DECISIÓN DE HALLAZGOS
 *
 * Consolida alertas ruidosas de múltiples detectores en hallazgos de
 * ataque multi-etapa accionables, con mitigación de falsos positivos
 * y enriquecimiento de víctima/pérdida.
 * =================================================================
 */

pub mod alert_store;
pub mod cluster_index;
pub mod config;
pub mod context_store;
pub mod decision;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod persistor;
pub mod registry;
pub mod suppression;

pub use config::EngineConfig;
pub use dispatcher::EngineState;
pub use engine::CorrelationEngine;
pub use error::EngineError;
pub use registry::{BaseBot, BotRegistry, Subscription};
// FIN DEL ARCHIVO [libs/domain/correlation-engine/src/lib.rs]
