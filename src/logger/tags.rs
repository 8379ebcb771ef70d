/// Log tags identifying the originating subsystem
///
/// Each tag renders with a fixed color so interleaved output stays readable.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Api,
    Rpc,
    Holders,
    Portfolio,
    Tokens,
    Tools,
}

impl LogTag {
    /// Uncolored name used in filtering and plain output
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Api => "API",
            LogTag::Rpc => "RPC",
            LogTag::Holders => "HOLDERS",
            LogTag::Tokens => "TOKENS",
            LogTag::Portfolio => "PORTFOLIO",
            LogTag::Tools => "TOOLS",
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
