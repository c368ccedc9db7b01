//! The `[business]` section: who the assistant speaks for, when the shop is
//! open, and which canned facts it may quote.
//!
//! Defaults describe the Go Waffles shop in La Serena, Chile.

use relaybot_core::knowledge::{FactSource, KnowledgeBase};
use relaybot_core::schedule::{TimeWindow, WeeklySchedule};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Name used in the knowledge block's introduction
    #[serde(default = "default_business_name")]
    pub name: String,

    /// City shown next to the current local time
    #[serde(default = "default_location")]
    pub location: String,

    /// IANA zone the schedule is expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Ordered knowledge entries; order is kept in the prompt
    #[serde(default = "default_knowledge")]
    pub knowledge: Vec<KnowledgeEntryConfig>,
}

fn default_business_name() -> String {
    "Go Waffles".into()
}
fn default_location() -> String {
    "La Serena, Chile".into()
}
fn default_timezone() -> String {
    "America/Santiago".into()
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_business_name(),
            location: default_location(),
            timezone: default_timezone(),
            schedule: ScheduleConfig::default(),
            knowledge: default_knowledge(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Monday to Friday
    #[serde(default = "default_weekday_window")]
    pub weekday: WindowConfig,

    /// Saturday and Sunday
    #[serde(default = "default_weekend_window")]
    pub weekend: WindowConfig,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            weekday: default_weekday_window(),
            weekend: default_weekend_window(),
        }
    }
}

/// An `HH:MM` open/close pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub start: String,
    pub end: String,
}

fn default_weekday_window() -> WindowConfig {
    WindowConfig {
        start: "16:00".into(),
        end: "21:00".into(),
    }
}
fn default_weekend_window() -> WindowConfig {
    WindowConfig {
        start: "15:30".into(),
        end: "21:30".into(),
    }
}

/// One `[[business.knowledge]]` table.
///
/// Exactly one of `fact` or `from_schedule = true` must be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntryConfig {
    pub topic: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub from_schedule: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl KnowledgeEntryConfig {
    fn text(topic: &str, fact: &str) -> Self {
        Self {
            topic: topic.into(),
            fact: Some(fact.into()),
            from_schedule: false,
        }
    }

    fn schedule(topic: &str) -> Self {
        Self {
            topic: topic.into(),
            fact: None,
            from_schedule: true,
        }
    }

    fn source(&self) -> Result<FactSource, ConfigError> {
        match (&self.fact, self.from_schedule) {
            (Some(text), false) => Ok(FactSource::Text(text.clone())),
            (None, true) => Ok(FactSource::Schedule),
            _ => Err(relaybot_core::error::ProfileError::AmbiguousEntry(self.topic.clone()).into()),
        }
    }
}

fn default_knowledge() -> Vec<KnowledgeEntryConfig> {
    vec![
        KnowledgeEntryConfig::text(
            "ubicacion",
            "Estamos ubicados en Avenida Gabriel González Videla 3170, La Serena. También puedes encontrarnos en google maps como 'Go Waffles'.",
        ),
        KnowledgeEntryConfig::schedule("horarios"),
        KnowledgeEntryConfig::text(
            "promociones",
            "Tenemos un 15% de descuento usando el cupón PRIMERACOMPRA en gowaffles.cl",
        ),
        KnowledgeEntryConfig::text(
            "canales_venta",
            "Puedes comprar en tu delivery app favorita (UberEats, PedidosYa o Rappi) o a través de nuestra página web gowaffles.cl",
        ),
        KnowledgeEntryConfig::text(
            "carta",
            "Encuentra todos nuestros productos en gowaffles.cl/pedir",
        ),
        KnowledgeEntryConfig::text(
            "trabajo",
            "Si quieres trabajar con nosotros, puedes escribir a contacto@gowaffles.cl o rellenar el formulario en gowaffles.cl/nosotros",
        ),
        KnowledgeEntryConfig::text(
            "problemas",
            "Si tuviste algún inconveniente con tu pedido escríbenos a contacto@gowaffles.cl",
        ),
        KnowledgeEntryConfig::text(
            "retraso",
            "Si quieres conocer el estado de tu pedido puedes revisarlo directamente en la plataforma en la que hiciste tu pedido (delivery app o gowaffles.cl)",
        ),
        KnowledgeEntryConfig::text(
            "ejecutivo",
            "Si necesitas hablar con un encargado del local, comunícate al https://wa.me/56953717707",
        ),
        KnowledgeEntryConfig::text(
            "redes_sociales",
            "Encuentranos en instagram o tiktok como @gowaffles.cl",
        ),
        KnowledgeEntryConfig::text(
            "categorías",
            "Tenemos waffles dulces, salados y personalizados. También tenemos milkshakes, frappes, limonadas, Mini Go, helados y bebidas",
        ),
        KnowledgeEntryConfig::text(
            "productos_disponibles",
            "La carta completa con todos los productos, ingredientes y precios está disponible exclusivamente en gowaffles.cl/pedir",
        ),
        KnowledgeEntryConfig::text(
            "zona_delivery",
            "Cada delivery app tiene su propio radio de despacho. En gowaffles.cl/local puedes ver la cobertura de despacho para las ventas de nuestro sitio web",
        ),
    ]
}

impl BusinessConfig {
    /// Parse the configured zone name.
    pub fn time_zone(&self) -> Result<chrono_tz::Tz, ConfigError> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            relaybot_core::error::ProfileError::UnknownTimeZone(self.timezone.clone()).into()
        })
    }

    pub fn weekly_schedule(&self) -> Result<WeeklySchedule, ConfigError> {
        let weekday = TimeWindow::parse(&self.schedule.weekday.start, &self.schedule.weekday.end)?;
        let weekend = TimeWindow::parse(&self.schedule.weekend.start, &self.schedule.weekend.end)?;
        Ok(WeeklySchedule::new(weekday, weekend))
    }

    /// Build the immutable knowledge base, rendering schedule-derived facts.
    pub fn knowledge_base(&self) -> Result<KnowledgeBase, ConfigError> {
        let schedule = self.weekly_schedule()?;
        let definitions = self
            .knowledge
            .iter()
            .map(|entry| Ok((entry.topic.clone(), entry.source()?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(KnowledgeBase::resolve(definitions, &schedule)?)
    }
}
