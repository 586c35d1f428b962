//! Keyword tables
//!
//! The built-in tables hold the Spanish phrases the website has always used.
//! A YAML file with the same shape can replace them; the order of `intents`
//! in the file is the tie-break order of the classifier.

use std::collections::HashSet;
use std::path::Path;

use lead_agent_core::{Intent, UrgencyLevel};
use serde::{Deserialize, Serialize};

use crate::{Result, TextProcessingError};

/// Phrases associated with one intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentKeywords {
    pub intent: Intent,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Phrases per urgency level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UrgencyKeywords {
    #[serde(default)]
    pub alta: Vec<String>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub baja: Vec<String>,
}

impl UrgencyKeywords {
    pub fn for_level(&self, level: UrgencyLevel) -> &[String] {
        match level {
            UrgencyLevel::Alta => &self.alta,
            UrgencyLevel::Media => &self.media,
            UrgencyLevel::Baja => &self.baja,
        }
    }
}

/// Complete keyword configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Scored intents in tie-break order
    pub intents: Vec<IntentKeywords>,
    /// Any of these forces a human handoff
    #[serde(default)]
    pub frustration: Vec<String>,
    #[serde(default)]
    pub urgency: UrgencyKeywords,
}

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeywordConfig {
    fn default() -> Self {
        let table: [(Intent, &[&str]); 12] = [
            (
                Intent::ConsultaGeneral,
                &[
                    "qué hace furnarius",
                    "qué hacen",
                    "servicios",
                    "sobre ustedes",
                    "quiénes son",
                    "información",
                    "me pueden contar",
                ],
            ),
            (
                Intent::Cotizacion,
                &[
                    "cotizar",
                    "cotización",
                    "presupuesto",
                    "precio",
                    "cuánto cuesta",
                    "cuanto cuesta",
                    "cuánto sale",
                    "cuanto sale",
                    "valor",
                    "tarifa",
                    "quiero contratar",
                    "necesito",
                ],
            ),
            (
                Intent::Disponibilidad,
                &[
                    "disponibilidad",
                    "disponible",
                    "fecha",
                    "tienen libre",
                    "está libre",
                    "reservar",
                    "agendar",
                    "para el",
                    "para la fecha",
                ],
            ),
            (
                Intent::TiposEventos,
                &[
                    "qué eventos",
                    "que eventos",
                    "tipos de eventos",
                    "qué tipo de evento",
                    "casamientos",
                    "cumpleaños",
                    "bodas",
                    "corporativos",
                    "15 años",
                ],
            ),
            (
                Intent::CatalogoEstilos,
                // "diseños" is listed twice and therefore scores twice
                &[
                    "estilos",
                    "estilo",
                    "catálogo",
                    "catalogo",
                    "ver opciones",
                    "inspiración",
                    "inspiracion",
                    "ideas",
                    "diseños",
                    "diseños",
                    "fotos",
                    "galería",
                    "galeria",
                    "ejemplos",
                    "minimalista",
                    "boho",
                    "glam",
                    "romántico",
                    "romantico",
                ],
            ),
            (
                Intent::Logistica,
                &[
                    "logística",
                    "logistica",
                    "entrega",
                    "armado",
                    "desarmado",
                    "montaje",
                    "desmontaje",
                    "instalación",
                    "instalacion",
                    "cómo funciona",
                    "como funciona",
                    "horarios",
                ],
            ),
            (
                Intent::ZonasCobertura,
                &[
                    "zona",
                    "zonas",
                    "cobertura",
                    "dónde trabajan",
                    "donde trabajan",
                    "ciudades",
                    "provincia",
                    "van a",
                    "llegan a",
                    "atienden",
                ],
            ),
            (
                Intent::ContactoHumano,
                &[
                    "hablar",
                    "asesor",
                    "persona",
                    "alguien",
                    "urgente",
                    "llamame",
                    "llámame",
                    "contacto",
                    "teléfono",
                    "telefono",
                    "whatsapp",
                    "necesito ayuda",
                    "atención",
                    "atencion",
                ],
            ),
            (
                Intent::Faq,
                &[
                    "pregunta",
                    "frecuente",
                    "dudas",
                    "consulta",
                    "pago",
                    "pagos",
                    "reserva",
                    "seña",
                    "cancelación",
                    "cancelacion",
                    "cancelar",
                    "políticas",
                    "politicas",
                    "condiciones",
                ],
            ),
            (
                Intent::Reprogramacion,
                &[
                    "reprogramar",
                    "cambiar fecha",
                    "mover",
                    "posponer",
                    "adelantar",
                    "modificar",
                ],
            ),
            (
                Intent::Seguimiento,
                &[
                    "seguimiento",
                    "ya consulté",
                    "ya consulte",
                    "ya pregunté",
                    "ya pregunte",
                    "retomar",
                    "continuar",
                ],
            ),
            (Intent::Fallback, &[]),
        ];

        Self {
            intents: table
                .into_iter()
                .map(|(intent, keywords)| IntentKeywords {
                    intent,
                    keywords: phrases(keywords),
                })
                .collect(),
            frustration: phrases(&[
                "no entendés",
                "no entendes",
                "no me ayudas",
                "no sirve",
                "mal servicio",
                "esto no funciona",
                "quiero hablar con",
                "dame a alguien",
            ]),
            urgency: UrgencyKeywords {
                alta: phrases(&["urgente", "ya", "rápido", "rapido", "cuanto antes", "pronto"]),
                media: phrases(&["próximamente", "proximamente", "en unos días", "en unos dias"]),
                baja: phrases(&["viendo opciones", "averiguando", "explorando"]),
            },
        }
    }
}

impl KeywordConfig {
    /// Parse and validate a YAML keyword table
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: KeywordConfig = serde_yaml::from_str(yaml)?;
        config.normalized().validated()
    }

    /// Load a YAML keyword table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| TextProcessingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            intents = config.intents.len(),
            "Loaded keyword table"
        );
        Ok(config)
    }

    /// Keywords are matched against lowercased text
    fn normalized(mut self) -> Self {
        let lower = |list: &mut Vec<String>| {
            for phrase in list.iter_mut() {
                *phrase = phrase.trim().to_lowercase();
            }
            list.retain(|p| !p.is_empty());
        };
        for entry in &mut self.intents {
            lower(&mut entry.keywords);
        }
        lower(&mut self.frustration);
        lower(&mut self.urgency.alta);
        lower(&mut self.urgency.media);
        lower(&mut self.urgency.baja);
        self
    }

    fn validated(self) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &self.intents {
            if !seen.insert(entry.intent) {
                return Err(TextProcessingError::InvalidTable(format!(
                    "intent '{}' listed more than once",
                    entry.intent
                )));
            }
            if entry.intent == Intent::Fallback && !entry.keywords.is_empty() {
                return Err(TextProcessingError::InvalidTable(
                    "fallback cannot have keywords".to_string(),
                ));
            }
        }
        Ok(self)
    }

    pub fn keywords_for(&self, intent: Intent) -> &[String] {
        self.intents
            .iter()
            .find(|entry| entry.intent == intent)
            .map(|entry| entry.keywords.as_slice())
            .unwrap_or(&[])
    }
}
