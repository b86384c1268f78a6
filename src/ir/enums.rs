//! Closed enumerations of the IR
//!
//! Documents carry these as integer codes. Conversion is checked: reserved
//! slots, end sentinels and any other unknown code are rejected.

use serde::Serialize;
use std::fmt;

/// An enumeration stored as an integer code in the config document
pub trait CodeEnum: Sized + Copy + 'static {
    /// Human-readable kind used in error messages (e.g. "platform")
    const KIND: &'static str;

    /// Every selectable member, in code order
    const ALL: &'static [Self];

    fn code(self) -> i64;

    fn name(self) -> &'static str;

    fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }
}

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl CodeEnum for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl TryFrom<i64> for $name {
            type Error = i64;

            fn try_from(code: i64) -> Result<Self, i64> {
                <Self as CodeEnum>::from_code(code).ok_or(code)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

code_enum! {
    /// Target platform of the generated application
    pub enum Platform: "platform" {
        Linux = 0 => "LINUX",
        Android = 1 => "ANDROID",
        Rtos = 2 => "RTOS",
        Qnx = 3 => "QNX",
    }
}

code_enum! {
    /// Language of the generated code
    pub enum Lang: "lang" {
        Cpp = 0 => "CPP",
        C = 1 => "C",
        Rust = 2 => "RUST",
        Python = 3 => "PYTHON",
        Java = 4 => "JAVA",
    }
}

code_enum! {
    /// Transport binding of an app
    pub enum ProtocolType: "protocol_type" {
        /// In-process
        Intra = 0 => "INTRA",
        Sedds = 1 => "SEDDS",
        SomeIp = 2 => "SOMEIP",
        ZmqIpc = 3 => "ZMQ_IPC",
        ZmqTcp = 4 => "ZMQ_TCP",
        ZmqEpgm = 5 => "ZMQ_EPGM",
        /// Shared memory
        Shm = 6 => "SHM",
        Hybrid = 7 => "HYBRID",
    }
}

code_enum! {
    /// Origin of a message definition
    pub enum MsgType: "msg_type" {
        Proto = 0 => "PROTO",
        SomeIp = 1 => "SOMEIP",
        FastDds = 2 => "FASTDDS",
        CycloneDds = 3 => "CYCLONEDDS",
        RtiConnext = 4 => "RTICONNEXT",
        Ros = 5 => "ROS",
        Raw = 6 => "RAW",
        Custom = 7 => "CUSTOM",
    }
}

code_enum! {
    pub enum TimerType: "timer type" {
        Steady = 0 => "STEADY",
        System = 1 => "SYSTEM",
        Custom = 2 => "CUSTOM",
    }
}

code_enum! {
    pub enum ModuleType: "module type" {
        TimerProc = 0 => "TIMER_PROC",
        SyncProc = 1 => "SYNC_PROC",
        CondProc = 2 => "COND_PROC",
    }
}
