//! The closed set of builtin operations.
//!
//! Builtins are bound in the environment as `Builtin` cells at start-up and
//! resolved while compiling; their opcodes never reach run time as data.

macro_rules! builtins {
    ($($variant:ident => $name:literal, $usage:literal),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Builtin {
            $($variant),*
        }

        impl Builtin {
            /// Every builtin, in opcode order.
            pub const ALL: &'static [Builtin] = &[$(Builtin::$variant),*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Builtin::$variant => $name),*
                }
            }

            /// Call shape shown when arguments are missing.
            pub fn usage(self) -> &'static str {
                match self {
                    $(Builtin::$variant => $usage),*
                }
            }
        }
    };
}

builtins! {
    Add => "+", "(+ a b)",
    Sub => "-", "(- a b)",
    Mul => "*", "(* a b)",
    Div => "/", "(/ a b)",
    Mod => "%", "(% a b)",
    Lt => "lt", "(lt a b)",
    Gt => "gt", "(gt a b)",
    If => "if", "(if condition then [else])",
    While => "while", "(while condition body)",
    Def => "def", "(def symbol value)",
    Mut => "mut", "(mut symbol value)",
    Print => "print", "(print value)",
    Do => "do", "(do expr ...)",
    Fn => "fn", "(fn param ... body)",
    Quote => "quote", "(quote expr)",
    Car => "car", "(car list)",
    Cdr => "cdr", "(cdr list)",
    Cons => "cons", "(cons head tail)",
    Concat => "concat", "(concat a b)",
    Alloc => "alloc", "(alloc size)",
    AllocStr => "alloc-str", "(alloc-str size)",
    Get => "get", "(get buffer index)",
    UGet => "uget", "(uget buffer index)",
    Put => "put", "(put buffer index byte)",
    UPut => "uput", "(uput buffer index byte)",
    Size => "size", "(size buffer)",
    USize => "usize", "(usize buffer)",
    Write => "write", "(write buffer value)",
    Eval => "eval", "(eval expr)",
    Pixel => "pixel", "(pixel x y color)",
    RectFill => "rectfill", "(rectfill x y w h color)",
    Flip => "flip", "(flip)",
    BlitMono => "blit-mono", "(blit-mono bitmap x y w h color)",
    BlitMonoInv => "blit-mono-inv", "(blit-mono-inv bitmap x y w h color)",
    Inkey => "inkey", "(inkey)",
    Ls => "ls", "(ls)",
    Load => "load", "(load path)",
    Save => "save", "(save buffer path)",
    UdpPoll => "udp-poll", "(udp-poll)",
    UdpSend => "udp-send", "(udp-send host port buffer)",
    TcpBind => "tcp-bind", "(tcp-bind port)",
    TcpConnect => "tcp-connect", "(tcp-connect host port)",
    TcpSend => "tcp-send", "(tcp-send buffer)",
}

impl Builtin {
    pub fn opcode(self) -> u64 {
        self as u64
    }

    pub fn from_opcode(opcode: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(opcode).ok()?).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Builtins that are registered but have no implementation here.
    pub fn is_network(self) -> bool {
        matches!(
            self,
            Builtin::UdpPoll
                | Builtin::UdpSend
                | Builtin::TcpBind
                | Builtin::TcpConnect
                | Builtin::TcpSend
        )
    }
}
