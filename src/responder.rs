//! Canned assistant replies
//!
//! Replies are chosen by the first rule whose keywords appear in the
//! lower-cased input. Rule order is significant: "ciao, come stai?" hits
//! both the greeting and the well-being rule and must answer as a greeting.

/// A reply returned when any of `keywords` is a substring of the input
#[derive(Debug, Clone, Copy)]
pub struct ReplyRule {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

impl ReplyRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Ordered rule table, evaluated top to bottom
pub const RULES: &[ReplyRule] = &[
    ReplyRule {
        keywords: &["ciao", "salve"],
        reply: "Ciao! Come posso aiutarti oggi? 👋",
    },
    ReplyRule {
        keywords: &["come stai"],
        reply: "Sto benissimo, grazie! Sono sempre pronto ad aiutarti. 😊",
    },
    ReplyRule {
        keywords: &["python"],
        reply: "Python è un ottimo linguaggio! Posso aiutarti con codice, librerie, debugging e molto altro.",
    },
    ReplyRule {
        keywords: &["grazie"],
        reply: "Prego! Sono qui per aiutarti. 😊",
    },
    ReplyRule {
        keywords: &["aiuto", "help"],
        reply: "Certo! Dimmi di cosa hai bisogno e farò del mio meglio per aiutarti.",
    },
];

/// Generate the assistant reply for `text`
pub fn generate(text: &str) -> String {
    let lowered = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or_else(|| fallback(text), |rule| rule.reply.to_string())
}

/// Echoes the original (not lower-cased) input
fn fallback(text: &str) -> String {
    format!("Hai scritto: \"{text}\". Come posso aiutarti ulteriormente?")
}
