//! Context assembly: what the assistant "knows" at reply time.
//!
//! | Block | Source | Changes with |
//! |-------|--------|--------------|
//! | Persona | `[assistant] persona_prompt` | never |
//! | Knowledge | knowledge base, definition order | never |
//! | Now | clock + schedule oracle | every call |

pub mod assembler;
pub mod calendar;

pub use assembler::ContextAssembler;
pub use calendar::{capitalize, day_name, status_word};
