//! Host simulation platform
//!
//! Runs the whole appliance as an ordinary process: the two "serial
//! ports" become TCP bridge ports (connect with netcat to play the
//! instrument or the operator console), the HTTP and SNTP sockets are
//! real std sockets, the NVRAM is a small local file and the RTC is
//! the host clock plus a settable offset.
//!
//! Bridge ports and file locations come from the environment:
//!
//! | Variable                 | Default        | Purpose               |
//! |--------------------------|----------------|-----------------------|
//! | `RADMON_INSTRUMENT_PORT` | `7001`         | instrument serial in  |
//! | `RADMON_CONSOLE_PORT`    | `7002`         | operator console      |
//! | `RADMON_HTTP_PORT`       | `8080`         | HTTP interface        |
//! | `RADMON_NVRAM`           | `radmon.nvram` | settings file         |

pub mod error;
pub mod net;
pub mod nvram;
pub mod platform;
pub mod rtc;
pub mod timer;
pub mod uart;

pub use error::SimError;
pub use net::{SimTcpServer, SimUdp};
pub use nvram::SimNvram;
pub use platform::SimPlatform;
pub use rtc::SimRtc;
pub use timer::SimTimer;
pub use uart::SimUart;
