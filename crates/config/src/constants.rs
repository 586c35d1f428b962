//! Centralized copy and limits
//!
//! Every visitor-facing string lives here so wording changes never touch the
//! flow logic.

/// Pacing and retention limits
pub mod limits {
    /// Simulated "typing" delay before a response is shown
    pub const TYPING_DELAY_MS: u64 = 800;

    /// Upper bound accepted for the typing delay
    pub const MAX_TYPING_DELAY_MS: u64 = 10_000;

    /// Messages kept in the conversation history
    pub const MAX_HISTORY_MESSAGES: usize = 100;

    /// Smallest history cap accepted by validation
    pub const MIN_HISTORY_MESSAGES: usize = 10;

    /// Live sessions held by one server process
    pub const MAX_SESSIONS: usize = 1000;

    /// Idle time after which a live session is evicted (it stays in the store)
    pub const SESSION_IDLE_SECONDS: u64 = 3600;

    /// How often idle sessions are swept
    pub const SESSION_CLEANUP_SECONDS: u64 = 300;
}

/// Business identity defaults
pub mod business {
    /// Placeholder destination until the real number is configured
    pub const DEFAULT_WHATSAPP_NUMBER: &str = "1111111111";

    pub const DEFAULT_ADVISOR_NAME: &str = "Equipo Furnarius";
}

/// Storage namespace
pub mod storage {
    pub const DEFAULT_KEY_PREFIX: &str = "furnarius_chatbot_";
    pub const LEAD_DATA_KEY: &str = "lead_data";
    pub const CHAT_STATE_KEY: &str = "chat_state";
    pub const DEFAULT_DATA_DIR: &str = "data/sessions";
}

/// Greeting shown when a conversation starts
pub mod welcome {
    pub const MESSAGE: &str = "¡Hola! 👋 Soy el asistente virtual de Furnarius. Estoy acá para ayudarte a planificar tu evento y conseguir una cotización personalizada.";

    pub const FOLLOW_UP: &str = "Contame, ¿qué tipo de evento estás planeando?";
}

/// Main menu labels, in display order
pub mod menu {
    pub const BACK_TO_MENU: &str = "¿En qué más te puedo ayudar? Elegí una opción:";

    pub const QUOTE: &str = "Cotizar mi evento";
    pub const STYLES: &str = "Ver estilos / inspiración";
    pub const AVAILABILITY: &str = "Disponibilidad por fecha";
    pub const LOGISTICS: &str = "Logística y cobertura";
    pub const ADVISOR: &str = "Hablar con un asesor";

    /// Literals that force the main menu, matched case-insensitively
    pub const OVERRIDE_LITERALS: [&str; 2] = ["menu", "volver"];
}

/// Apologies used when nothing matched
pub const FALLBACK_MESSAGES: [&str; 3] = [
    "No estoy seguro de entenderte. ¿Podrías reformular tu pregunta?",
    "Disculpa, no logro interpretar eso. ¿Querés que te ayude con alguna de estas opciones?",
    "Mmm, no estoy captando bien tu consulta. Tal vez pueda ayudarte mejor si elegís una opción:",
];

/// Quotation prompts, one per step
pub mod quotation {
    pub const START: &str = "Genial. ¿Qué tipo de evento es?";
    pub const FECHA: &str =
        "¿Para qué fecha es? (si no la tenés exacta, decime el mes aproximado)";
    pub const CIUDAD: &str = "¿En qué ciudad/zona sería el evento?";
    pub const INVITADOS: &str = "¿Cuántos invitados estimás?";
    pub const LUGAR: &str = "¿Dónde es el evento?";
    pub const NECESIDAD: &str = "¿Qué necesitás principalmente?";
    pub const ESTILO: &str = "¿Qué estilo te gusta?";
    pub const REFERENCIAS: &str = "Si tenés fotos o referencias, describímelas o pegá links. Con eso afinamos mucho la propuesta.";
    pub const PRESUPUESTO: &str = "¿Tenés un rango de presupuesto estimado?";
    pub const RESUMEN: &str = "Perfecto. Con esto ya puedo armarte una propuesta inicial.";
    pub const RESUMEN_CLOSING: &str =
        "¿Querés que lo enviemos al equipo por WhatsApp para cotizar más rápido?";
    pub const CONFIRMACION: &str =
        "¡Gracias! Tu consulta quedó registrada. Cuando quieras, la enviamos al equipo por WhatsApp.";

    /// Value stored when the visitor skips references
    pub const NO_REFERENCES: &str = "Ninguna";
    pub const SKIP_REFERENCES: &str = "Omitir este paso";

    pub const SUMMARY_SEND: &str = "Sí, enviar por WhatsApp";
    pub const SUMMARY_EDIT: &str = "Agregar un dato";
    pub const SUMMARY_ADVISOR: &str = "Hablar con asesor";
    pub const SHOW_SUMMARY: &str = "Ver resumen";
    pub const BACK_TO_MENU: &str = "Volver al menú";
}

/// Human handoff copy
pub mod handoff {
    pub const INITIATING: &str =
        "Perfecto, te conecto con un asesor. Déjame confirmar algunos datos antes.";
    pub const MISSING_DATA: &str =
        "Para que el asesor pueda ayudarte mejor, necesito algunos datos rápidos:";
    pub const READY: &str =
        "Listo. ¿Querés que te contactemos por WhatsApp? Te paso tu consulta directo al equipo.";
    pub const MISSING_PREFIX: &str = "Para conectarte con un asesor, necesito que me digas: ";

    pub const CONTACT_WHATSAPP: &str = "Sí, contactar por WhatsApp";
    pub const QUOTE_FIRST: &str = "Antes quiero cotizar";
}

/// FAQ copy
pub mod faq {
    pub const NOT_LOADED: &str = "Todavía estoy cargando esa info para confirmártela sin errores. ¿Querés que te derive con un asesor ahora o preferís dejarme tus datos y te respondemos por WhatsApp?";

    pub const HEADER: &str = "Estas son las consultas más comunes:";
    pub const CLOSING: &str = "\n\nSi querés, te derivo con un asesor para confirmarlo con exactitud.";

    pub const PAYMENTS: &str = "\n💳 Pagos: ";
    pub const BOOKING: &str = "\n📝 Reserva: ";
    pub const CANCELLATIONS: &str = "\n❌ Cancelaciones: ";
    pub const LOGISTICS: &str = "\n🚚 Logística: ";
    pub const COVERAGE: &str = "\n📍 Cobertura: ";
    pub const TIMING: &str = "\n⏱️ Tiempos: ";

    pub const TOPIC_PAYMENTS: &str = "Sobre métodos de pago:\n\n";
    pub const TOPIC_BOOKING: &str = "Sobre reservas y señas:\n\n";
    pub const TOPIC_CANCELLATIONS: &str = "Sobre cancelaciones:\n\n";

    pub const ADVISOR: &str = "Hablar con asesor";
    pub const BACK_TO_MENU: &str = "Volver al menú";
    pub const LEAVE_DETAILS: &str = "Dejar datos por WhatsApp";
}

/// Styles, availability, logistics and general info copy
pub mod flows {
    pub const STYLES_QUESTION: &str = "Contame qué buscás y te orientamos: ¿preferís algo más minimalista, cálido-boho, glam o romántico?";
    pub const STYLES_CONFIRMED: &str = "¡Buena elección! Con ese estilo en mente podemos armarte una propuesta a medida. ¿Querés cotizar tu evento o hablar con un asesor?";

    pub const AVAILABILITY_MISSING: &str = "Puedo revisar tu fecha, pero para confirmarla necesitamos: fecha + ciudad + tipo de evento. ¿Me los pasás?";
    pub const AVAILABILITY_READY: &str = "Perfecto, tengo los datos de tu evento. Lo verificamos y te respondemos por WhatsApp con la disponibilidad exacta. ¿Te parece?";
    pub const AVAILABILITY_WHATSAPP: &str = "Sí, contactarme por WhatsApp";
    pub const AVAILABILITY_QUOTE_FIRST: &str = "Prefiero cotizar primero";

    pub const LOGISTICS_HEADER: &str = "Acá va la info de logística:";
    pub const LOGISTICS_CLOSING: &str = "\n¿Necesitás algo más?";
    pub const LOGISTICS_ADVISOR: &str = "Hablar con asesor ahora";
    pub const LOGISTICS_LEAVE_DETAILS: &str = "Dejar datos para WhatsApp";

    pub const GENERAL_INFO: &str = "Furnarius es una productora y ambientadora de eventos especializada en mobiliario, decoración y estética. Diseñamos experiencias únicas con nuestro mobiliario propio y un equipo creativo dedicado. ¿Querés cotizar tu evento o ver nuestros estilos?";
    pub const GENERAL_QUOTE: &str = "Cotizar mi evento";
    pub const GENERAL_STYLES: &str = "Ver estilos";
}

/// Outbound message copy
pub mod outbound {
    pub const GREETING: &str = "Hola Furnarius, quiero cotizar un evento.";
    pub const CLOSING: &str = "Gracias.";
    pub const CONFIRMATION: &str = "Perfecto, gracias por tu consulta. Te contactaremos pronto.";
    pub const BASE_URL: &str = "https://wa.me";
}
