// Canned assistant: a fixed keyword table answered after a simulated
// typing delay. Rules are checked in order and the first hit wins, so an
// input mentioning both finance and marketing gets the finance reply.

use std::time::Duration;

/// Simulated typing delay before a reply is delivered.
pub const TYPING_DELAY: Duration = Duration::from_millis(1500);

pub const GREETING: &str =
    "Hi! I'm here to help you find the perfect business solutions. What challenge are you facing?";

const FALLBACK: &str = "I understand you're looking for business solutions. Could you tell me more about your specific challenge? For example, are you looking to improve operations, increase sales, manage finances, or something else?";

/// Keyword rules, in priority order. Both keywords of a rule map to the
/// same reply; matching is substring-based and case-insensitive.
const RULES: [(&str, &str, &str); 4] = [
    (
        "cash flow",
        "finance",
        "I can help you with cash flow management! We have several financial solutions including automated invoicing systems, expense tracking tools, and virtual CFO services. Would you like me to show you some specific options?",
    ),
    (
        "marketing",
        "sales",
        "Great! For sales and marketing, we offer CRM systems, digital marketing courses, social media management tools, and lead generation platforms. What's your primary marketing challenge?",
    ),
    (
        "inventory",
        "stock",
        "Inventory management is crucial for SMEs! We have AI-powered inventory systems, stock tracking software, and supply chain optimization tools. These can help reduce wastage and improve efficiency.",
    ),
    (
        "hr",
        "employee",
        "For HR and people management, we offer payroll software, employee management systems, recruitment platforms, and performance tracking tools. What specific HR challenge are you facing?",
    ),
];

/// The canned reply for one user input.
pub fn respond(input: &str) -> &'static str {
    let input = input.to_lowercase();
    for (a, b, reply) in RULES {
        if input.contains(a) || input.contains(b) {
            return reply;
        }
    }
    FALLBACK
}

// ---------------------------------------------------------------------------
// Conversation state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub text: String,
}

/// Append-only transcript plus the typing indicator.
#[derive(Debug, Clone)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        ChatState {
            messages: vec![ChatMessage {
                sender: ChatSender::Bot,
                text: GREETING.to_string(),
            }],
            typing: false,
        }
    }
}

impl ChatState {
    pub fn new() -> Self {
        ChatState::default()
    }

    pub fn push_user(&mut self, text: String) -> ChatMessage {
        let message = ChatMessage {
            sender: ChatSender::User,
            text,
        };
        self.messages.push(message.clone());
        self.typing = true;
        message
    }

    pub fn push_bot(&mut self, text: String) -> ChatMessage {
        let message = ChatMessage {
            sender: ChatSender::Bot,
            text,
        };
        self.messages.push(message.clone());
        self.typing = false;
        message
    }
}
