//! Loads ability configuration documents, resolves their defaults, and
//! round-trips each through the binary form a server would send.
//!
//! Usage: `ability-config [DOCUMENT.json ...]`. Without arguments the
//! bundled documents under `data/` are used. `DATAFORGE_LIMITS` may hold
//! a JSON object overriding the stream limits, e.g.
//! `{"max_string_len": 64}`.

use std::error::Error;

use dataforge::prelude::*;
use serde_json::Value as Json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BUNDLED: &[(&str, &str)] = &[
    ("data/launch.json", include_str!("../data/launch.json")),
    ("data/strong_arms.json", include_str!("../data/strong_arms.json")),
    ("data/night_vision.json", include_str!("../data/night_vision.json")),
];

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

fn id(text: &str) -> Result<Identifier, DataforgeError> {
    Ok(text.parse()?)
}

fn hud_render() -> Result<Schema, DataforgeError> {
    Ok(Schema::builder()
        .add_default("should_render", BoolType, true)
        .add_default("sprite", IdentifierType, id("origins:resource_bar")?)
        .add_default("bar_index", IntType, 0)
        .build())
}

fn build_registry() -> Result<SchemaRegistry, DataforgeError> {
    let mut registry = SchemaRegistry::new();

    registry.register(
        id("origins:active_launch")?,
        Schema::builder()
            .add("speed", FloatType)
            .add("cooldown", IntType)
            .add_computed("charge_ticks", IntType, |data| {
                Ok(data.get_int("cooldown")? / 4)
            })
            .add_optional("sound", IdentifierType)
            .add("hud_render", RecordType::new(hud_render()?))
            .add_default("key", StringType, "primary")
            .build(),
    )?;

    registry.register(
        id("origins:attribute")?,
        Schema::builder()
            .add("modifier", ListType::new(AttributeModifierType))
            .add_default("update_health", BoolType, true)
            .build(),
    )?;

    registry.register(
        id("origins:toggle")?,
        Schema::builder()
            .add_default("key", StringType, "primary")
            .add_default("active_by_default", BoolType, true)
            .add_optional("attribute", IdentifierType)
            .build(),
    )?;

    Ok(registry)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Why a document failed to load.
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error(transparent)]
    Data(#[from] DataforgeError),

    /// The instance read back from the binary form differs from the one
    /// written.
    #[error("binary round trip changed the {0} instance")]
    RoundTrip(Identifier),
}

impl LoadError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Data(e) => e.kind(),
            Self::RoundTrip(_) => "round_trip",
        }
    }
}

impl From<DataError> for LoadError {
    fn from(err: DataError) -> Self {
        Self::Data(err.into())
    }
}

/// One document after loading.
struct Loaded {
    power_type: Identifier,
    /// Size of the binary form.
    bytes: usize,
    /// The document with every default filled in.
    resolved: Json,
}

/// Picks the schema named by the document's `type` member. Schemas
/// ignore members they do not declare, so `type` needs no field of its own.
fn power_type(document: &Json) -> Result<Identifier, DataforgeError> {
    match document.get("type") {
        Some(Json::String(text)) => id(text),
        Some(other) => {
            let err = FieldError::wrong_shape("string", other);
            Err(DataError::from(DocumentError::syntax("type", &err)).into())
        }
        None => Err(DataError::from(DocumentError::MissingField("type".into())).into()),
    }
}

fn check_round_trip(
    power_type: &Identifier,
    sent: &Instance<'_>,
    received: &Instance<'_>,
) -> Result<(), LoadError> {
    if sent != received {
        return Err(LoadError::RoundTrip(power_type.clone()));
    }
    Ok(())
}

fn load(
    registry: &SchemaRegistry,
    limits: &StreamLimits,
    text: &str,
) -> Result<Loaded, LoadError> {
    let document: Json = serde_json::from_str(text).map_err(|e| {
        DataError::from(DocumentError::Syntax {
            field: None,
            kind: "json",
            message: e.to_string(),
        })
    })?;
    let power_type = power_type(&document)?;
    let schema = registry.get(&power_type).map_err(DataforgeError::from)?;
    let instance = schema.read_document(&document)?;

    let mut out = PacketWriter::with_limits(*limits);
    schema.write(&mut out, &instance)?;
    let bytes = out.into_bytes();

    let mut input = PacketReader::with_limits(&bytes, *limits);
    let received = schema.read(&mut input)?;
    if !input.is_empty() {
        return Err(DataError::TrailingBytes(input.remaining()).into());
    }
    check_round_trip(&power_type, &instance, &received)?;

    Ok(Loaded {
        bytes: bytes.len(),
        resolved: schema.write_document(&received)?,
        power_type,
    })
}

fn limits_from_env() -> Result<StreamLimits, Box<dyn Error>> {
    match std::env::var("DATAFORGE_LIMITS") {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(std::env::VarError::NotPresent) => Ok(StreamLimits::default()),
        Err(e) => Err(e.into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let limits = limits_from_env()?;
    let registry = build_registry()?;
    tracing::info!(
        schemas = registry.len(),
        max_string_len = limits.max_string_len,
        max_list_len = limits.max_list_len,
        "ability-config starting"
    );

    let paths: Vec<String> = std::env::args().skip(1).collect();
    let documents: Vec<(String, String)> = if paths.is_empty() {
        BUNDLED
            .iter()
            .map(|(name, text)| ((*name).to_owned(), (*text).to_owned()))
            .collect()
    } else {
        paths
            .into_iter()
            .map(|path| std::fs::read_to_string(&path).map(|text| (path, text)))
            .collect::<Result<_, _>>()?
    };

    let mut failed = 0usize;
    for (name, text) in &documents {
        match load(&registry, &limits, text) {
            Ok(loaded) => {
                tracing::info!(
                    document = %name,
                    power_type = %loaded.power_type,
                    bytes = loaded.bytes,
                    "document loaded"
                );
                println!("{}", serde_json::to_string_pretty(&loaded.resolved)?);
            }
            Err(e) => {
                failed += 1;
                tracing::error!(document = %name, kind = e.kind(), "{e}");
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} documents failed to load", documents.len()).into());
    }
    Ok(())
}
