//! Demonstration conversations created on login

use super::types::{Conversation, Message, Role};
use crate::clock::Clock;

struct SeedConversation {
    title: &'static str,
    created_at: &'static str,
    turns: &'static [(Role, &'static str)],
}

const SEEDS: &[SeedConversation] = &[
    SeedConversation {
        title: "Benvenuto su Archabot",
        created_at: "2025-02-15 10:00",
        turns: &[
            (Role::Assistant, "Ciao! Sono Archabot, il tuo assistente AI. Come posso aiutarti oggi?"),
            (Role::User, "Ciao! Puoi spiegarmi cosa sai fare?"),
            (Role::Assistant, "Certo! Posso aiutarti con molte cose:\n- Rispondere a domande\n- Analizzare immagini\n- Aiutarti con la programmazione\n- Creare contenuti\n- E molto altro!"),
        ],
    },
    SeedConversation {
        title: "Aiuto Python",
        created_at: "2025-02-14 14:30",
        turns: &[
            (Role::User, "Ho bisogno di aiuto con Python"),
            (Role::Assistant, "Certo! Sono qui per aiutarti. Cosa ti serve per Python?"),
            (Role::User, "Come posso leggere un file CSV?"),
            (Role::Assistant, "Puoi usare la libreria pandas:\n\n```python\nimport pandas as pd\ndf = pd.read_csv('file.csv')\nprint(df.head())\n```"),
        ],
    },
    SeedConversation {
        title: "Ricette Italiane",
        created_at: "2025-02-13 09:15",
        turns: &[
            (Role::User, "Dammi una ricetta italiana semplice"),
            (Role::Assistant, "Ecco una ricetta per la pasta aglio e olio:\n\n🍝 **Ingredienti:**\n- 400g spaghetti\n- 4 spicchi d'aglio\n- 100ml olio extravergine\n- Peperoncino q.b.\n- Prezzemolo\n- Sale"),
            (Role::User, "Perfetto, grazie!"),
            (Role::Assistant, "Prego! Buon appetito! 🍝"),
        ],
    },
    SeedConversation {
        title: "Configurazione API REST",
        created_at: "2025-02-12 16:45",
        turns: &[
            (Role::Assistant, "Benvenuto nella sezione configurazione API!"),
            (Role::User, "Come posso creare una API REST con Flask?"),
            (Role::Assistant, "Ecco un esempio base:\n\n```python\nfrom flask import Flask, jsonify\n\napp = Flask(__name__)\n\n@app.route('/api/data')\ndef get_data():\n    return jsonify({'message': 'Hello API'})\n```"),
        ],
    },
    SeedConversation {
        title: "Consigli di Viaggio",
        created_at: "2025-02-11 11:00",
        turns: &[
            (Role::User, "Sto pianificando un viaggio in Italia"),
            (Role::Assistant, "Che bello! L'Italia è meravigliosa. Quali città vorresti visitare?"),
            (Role::User, "Roma, Firenze e Venezia"),
            (Role::Assistant, "Ottima scelta!\n\n🏛️ **ROMA** (3-4 giorni):\n- Colosseo e Fori Romani\n- Vaticano e Cappella Sistina\n\n🎨 **FIRENZE** (2-3 giorni):\n- Galleria degli Uffizi\n- Duomo\n\n🚣 **VENEZIA** (2 giorni):\n- Piazza San Marco\n- Giro in gondola"),
        ],
    },
];

/// Number of conversations produced by [`seed_conversations`]
#[cfg(test)]
pub const SEED_COUNT: usize = SEEDS.len();

/// Build the seed set, newest first. Content is fixed; ids and message
/// timestamps are fresh on every call.
pub fn seed_conversations(clock: &dyn Clock) -> Vec<Conversation> {
    SEEDS
        .iter()
        .map(|seed| {
            let mut conv = Conversation::new(clock.new_id(), seed.title, seed.created_at);
            conv.messages = seed
                .turns
                .iter()
                .map(|(role, content)| Message {
                    id: clock.new_id(),
                    role: *role,
                    content: (*content).to_string(),
                    timestamp: clock.display_time(),
                    attachments: Vec::new(),
                })
                .collect();
            conv
        })
        .collect()
}
