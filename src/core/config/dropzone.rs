//=========================================================================
// Drop Zone Declarations
//
// Value of the `dropzone` attribute carried by drop targets:
//
//   "true" | "copy" | "move"   [ " emittername=<name>" ]
//
// Drop-zone hit testing lives outside this crate; this module only owns the
// declaration format so hosts and the drop module agree on it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;

//=== Internal Dependencies ===============================================

use super::{attributes, ConfigError, DropEffect, EmitterName};

//=== DropzoneConfig ======================================================

/// What a drop zone accepts.
///
/// Allowing both effects (or neither) renders as `"true"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropzoneConfig {
    pub allow_copy: bool,
    pub allow_move: bool,

    /// Only accept drags published under this emitter.
    pub emitter: Option<EmitterName>,
}

impl DropzoneConfig {
    /// Accepts both copy and move from any emitter.
    pub fn any() -> Self {
        Self {
            allow_copy: true,
            allow_move: true,
            emitter: None,
        }
    }

    pub fn copy_only() -> Self {
        Self {
            allow_copy: true,
            allow_move: false,
            emitter: None,
        }
    }

    pub fn move_only() -> Self {
        Self {
            allow_copy: false,
            allow_move: true,
            emitter: None,
        }
    }

    pub fn with_emitter(mut self, emitter: EmitterName) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Returns `true` if a drag with `effect`, published under `emitter`,
    /// may be dropped here.
    pub fn accepts(&self, effect: DropEffect, emitter: &EmitterName) -> bool {
        let effect_ok = match (self.allow_copy, self.allow_move) {
            (true, false) => effect == DropEffect::Copy,
            (false, true) => effect == DropEffect::Move,
            _ => true,
        };
        effect_ok && self.emitter.as_ref().map_or(true, |own| own == emitter)
    }

    fn effect_keyword(&self) -> &'static str {
        match (self.allow_copy, self.allow_move) {
            (true, false) => "copy",
            (false, true) => "move",
            _ => "true",
        }
    }
}

impl Default for DropzoneConfig {
    fn default() -> Self {
        Self::any()
    }
}

//=== Text Format =========================================================

impl fmt::Display for DropzoneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.effect_keyword())?;
        if let Some(emitter) = &self.emitter {
            write!(f, " emittername={emitter}")?;
        }
        Ok(())
    }
}

impl FromStr for DropzoneConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidAttribute {
            name: attributes::DROPZONE_TARGET.to_string(),
            value: s.to_string(),
        };

        let mut copy = false;
        let mut moves = false;
        let mut emitter = None;

        for token in s.split_whitespace() {
            match token.to_ascii_lowercase().as_str() {
                "true" => {
                    copy = true;
                    moves = true;
                }
                "copy" => copy = true,
                "move" => moves = true,
                _ => {
                    let name = token.strip_prefix("emittername=").ok_or_else(invalid)?;
                    emitter = Some(EmitterName::new(name).map_err(|_| invalid())?);
                }
            }
        }

        if !copy && !moves {
            copy = true;
            moves = true;
        }

        Ok(Self {
            allow_copy: copy,
            allow_move: moves,
            emitter,
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
