//! User-facing texts (Portuguese, shown in Telegram).

pub const WELCOME: &str = "👋 Olá! Eu sou um assistente AI baseado no Groq.\n\n\
Posso ajudar você com várias tarefas e manter memória das nossas conversas.\n\
Use /help para ver os comandos disponíveis.";

pub const HELP: &str = "🤖 Comandos disponíveis:\n\n\
/start - Iniciar o bot\n\
/help - Mostrar esta mensagem de ajuda\n\
/tools - Listar todas as ferramentas disponíveis\n\
/memory - Mostrar suas memórias armazenadas\n\
/clear - Limpar suas memórias\n\n\
Você também pode simplesmente me enviar mensagens e eu responderei!";

pub const NO_TOOLS: &str = "Nenhuma ferramenta disponível no momento.";
pub const TOOLS_HEADER: &str = "🛠️ Ferramentas disponíveis:\n\n";

pub const NO_MEMORIES: &str = "Você ainda não tem memórias armazenadas.";
pub const MEMORY_HEADER: &str = "🧠 Suas memórias:\n\n";

pub const MEMORY_CLEARED: &str = "✅ Suas memórias foram limpas com sucesso!";

pub const PROCESSING_ERROR: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Por favor, tente novamente.";

/// Fact stored by `/start`.
pub const LANGUAGE_KEY: &str = "language";
pub const DEFAULT_LANGUAGE: &str = "pt-BR";
