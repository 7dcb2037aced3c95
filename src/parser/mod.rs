//! TNEF decoding: the attribute stream reader, the MAPI property-block
//! reader, and the top-level message assembler.

pub mod mapi;
pub mod stream;
pub mod tnef;
