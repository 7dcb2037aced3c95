//! `tnefextract` — decode TNEF (Transport Neutral Encapsulation Format,
//! a.k.a. `winmail.dat`) containers into attachments and message bodies.
//!
//! This crate provides the core library: the attribute stream reader, the
//! MAPI property-block reader, the message assembler, and export helpers
//! for writing the decoded content out as files or a ZIP archive.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
