//! Lead data captured during the conversation
//!
//! `LeadData` is filled progressively. Every field is optional and a later
//! capture for the same slot overwrites the earlier value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flow::QuotationStep;

/// Urgency level detected from visitor wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Alta,
    Media,
    Baja,
}

impl UrgencyLevel {
    /// Priority order used when matching keywords
    pub const PRIORITY: [UrgencyLevel; 3] =
        [UrgencyLevel::Alta, UrgencyLevel::Media, UrgencyLevel::Baja];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Alta => "alta",
            UrgencyLevel::Media => "media",
            UrgencyLevel::Baja => "baja",
        }
    }
}

/// Preferred contact channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPreference {
    Whatsapp,
    Llamada,
    Email,
}

/// Generates a closed value domain with option ids and visitor-facing labels.
macro_rules! value_domain {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($id:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Quick-reply option id
            pub fn option_id(&self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            /// Label shown to the visitor, also the captured value
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.label() == label)
            }
        }
    };
}

value_domain!(
    /// Kinds of events covered
    EventType {
        Casamiento => ("evt_casamiento", "Casamiento"),
        Cumpleanos => ("evt_cumple", "Cumpleaños"),
        Corporativo => ("evt_corporativo", "Corporativo"),
        Lanzamiento => ("evt_lanzamiento", "Lanzamiento"),
        Otro => ("evt_otro", "Otro"),
    }
);

value_domain!(
    /// Venue kinds
    VenueType {
        Salon => ("loc_salon", "Salón"),
        Casa => ("loc_casa", "Casa"),
        AireLibre => ("loc_aire", "Aire libre"),
        Otro => ("loc_otro", "Otro"),
    }
);

value_domain!(
    /// Main need of the visitor
    MainNeed {
        Mobiliario => ("need_mobiliario", "Mobiliario"),
        Decoracion => ("need_decoracion", "Decoración"),
        AmbientacionCompleta => ("need_completo", "Ambientación completa"),
        AsesoriaEstetica => ("need_asesoria", "Asesoría estética"),
    }
);

value_domain!(
    /// Decoration styles
    DecorStyle {
        Minimalista => ("style_minimal", "Minimalista"),
        Boho => ("style_boho", "Boho"),
        Glam => ("style_glam", "Glam"),
        Industrial => ("style_industrial", "Industrial"),
        Romantico => ("style_romantico", "Romántico"),
        NoEstoySeguro => ("style_nosure", "No estoy seguro"),
    }
);

value_domain!(
    /// Budget ranges, never amounts
    BudgetRange {
        Basico => ("budget_basico", "Básico"),
        Medio => ("budget_medio", "Medio"),
        Premium => ("budget_premium", "Premium"),
        PorWhatsapp => ("budget_whatsapp", "Prefiero contarlo por WhatsApp"),
    }
);

/// Fields asked for before handing off to an advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffField {
    Name,
    EventType,
    EventDate,
    CityZone,
}

impl HandoffField {
    pub fn prompt_label(&self) -> &'static str {
        match self {
            HandoffField::Name => "tu nombre",
            HandoffField::EventType => "tipo de evento",
            HandoffField::EventDate => "fecha del evento",
            HandoffField::CityZone => "ciudad o zona",
        }
    }
}

/// Progressively captured lead record
///
/// Serialized with the same keys the website stores, so persisted leads stay
/// readable by other tooling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadData {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "tipo_evento", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Exact date or an approximate "junio 2026"
    #[serde(rename = "fecha_evento", default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(rename = "ciudad_zona", default, skip_serializing_if = "Option::is_none")]
    pub city_zone: Option<String>,
    #[serde(
        rename = "invitados_estimados",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub guest_count: Option<u32>,
    #[serde(rename = "lugar", default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    #[serde(
        rename = "necesidad_principal",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub main_need: Option<String>,
    #[serde(rename = "estilo_deseado", default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(
        rename = "presupuesto_rango",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_range: Option<String>,
    /// Links, descriptions or "Ninguna"
    #[serde(
        rename = "referencias_fotos",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub references: Option<String>,

    #[serde(rename = "urgencia", default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyLevel>,
    #[serde(
        rename = "preferencia_contacto",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_preference: Option<ContactPreference>,
    #[serde(
        rename = "consentimiento_contacto",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_consent: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeadData {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no content field is set (timestamps are ignored)
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.event_type.is_none()
            && self.event_date.is_none()
            && self.city_zone.is_none()
            && self.guest_count.is_none()
            && self.venue.is_none()
            && self.main_need.is_none()
            && self.style.is_none()
            && self.budget_range.is_none()
            && self.references.is_none()
            && self.urgency.is_none()
            && self.contact_preference.is_none()
            && self.contact_consent.is_none()
    }

    /// Shallow merge: every field set in `partial` overwrites ours.
    ///
    /// Stamps `created_at` on the first non-empty merge and `updated_at` on
    /// every non-empty merge.
    pub fn merge(&mut self, partial: LeadData) {
        if partial.is_empty() {
            return;
        }

        macro_rules! take {
            ($($field:ident),+) => {
                $(if partial.$field.is_some() {
                    self.$field = partial.$field;
                })+
            };
        }

        take!(
            name,
            phone,
            email,
            event_type,
            event_date,
            city_zone,
            guest_count,
            venue,
            main_need,
            style,
            budget_range,
            references,
            urgency,
            contact_preference,
            contact_consent
        );

        let now = Utc::now();
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }

    /// Event type, date and city are enough for an advisor to pick it up
    pub fn has_minimum_for_handoff(&self) -> bool {
        self.event_type.is_some() && self.event_date.is_some() && self.city_zone.is_some()
    }

    /// Handoff fields still missing, in prompt order
    pub fn missing_for_handoff(&self) -> Vec<HandoffField> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push(HandoffField::Name);
        }
        if self.event_type.is_none() {
            missing.push(HandoffField::EventType);
        }
        if self.event_date.is_none() {
            missing.push(HandoffField::EventDate);
        }
        if self.city_zone.is_none() {
            missing.push(HandoffField::CityZone);
        }
        missing
    }

    /// Whether the field asked at `step` already holds a value.
    ///
    /// Steps that ask nothing report `false`.
    pub fn is_filled_for(&self, step: QuotationStep) -> bool {
        match step {
            QuotationStep::TipoEvento => self.event_type.is_some(),
            QuotationStep::Fecha => self.event_date.is_some(),
            QuotationStep::Ciudad => self.city_zone.is_some(),
            QuotationStep::Invitados => self.guest_count.is_some(),
            QuotationStep::Lugar => self.venue.is_some(),
            QuotationStep::Necesidad => self.main_need.is_some(),
            QuotationStep::Estilo => self.style.is_some(),
            QuotationStep::Referencias => self.references.is_some(),
            QuotationStep::Presupuesto => self.budget_range.is_some(),
            QuotationStep::Resumen | QuotationStep::Confirmacion => false,
        }
    }

    /// First question step whose field is still empty
    pub fn first_unfilled_step(&self) -> Option<QuotationStep> {
        QuotationStep::ORDER
            .iter()
            .copied()
            .filter(QuotationStep::is_question)
            .find(|step| !self.is_filled_for(*step))
    }

    /// Human-readable bullet summary of every populated event field
    pub fn summary(&self) -> String {
        let mut lines = vec!["Resumen de tu evento:".to_string()];
        let guests = self.guest_count.map(|n| n.to_string());
        let entries: [(&str, Option<&String>); 9] = [
            ("Tipo", self.event_type.as_ref()),
            ("Fecha", self.event_date.as_ref()),
            ("Ciudad/zona", self.city_zone.as_ref()),
            ("Invitados", guests.as_ref()),
            ("Lugar", self.venue.as_ref()),
            ("Necesidad", self.main_need.as_ref()),
            ("Estilo", self.style.as_ref()),
            ("Presupuesto", self.budget_range.as_ref()),
            ("Referencias", self.references.as_ref()),
        ];
        for (label, value) in entries {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                lines.push(format!("• {}: {}", label, value));
            }
        }
        lines.join("\n")
    }
}
