//! Shared mock reader for the engine test suites
#![allow(dead_code)]

use std::collections::HashMap;

use nfcdump_core::{Bytes, MifareCommand, Modulation, Property, Reader, ReaderError, Target, Uid};

/// One recorded reader interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Passive selection, with the UID filter the caller passed.
    Select { uid: Option<Vec<u8>> },
    /// Raw transceive.
    Transceive { tx: Vec<u8> },
    /// Authentication attempt.
    Auth { block: u8, opcode: u8, key: [u8; 6] },
    /// Block read.
    Read { block: u8 },
    /// Block write.
    Write { block: u8, data: [u8; 16] },
    /// Property change.
    Property { property: Property, enabled: bool },
}

/// Scripted reader for the engine tests.
///
/// Behavior is controlled by a handful of knobs; every interaction is
/// recorded in `calls` for assertions.
#[derive(Debug)]
pub struct MockReader {
    /// Target returned by successful selections.
    pub target: Target,
    /// Every interaction, in order.
    pub calls: Vec<Call>,
    /// Card content served to reads and updated by writes.
    pub memory: HashMap<u8, [u8; 16]>,
    /// Blocks whose reads fail.
    pub failing_reads: Vec<u8>,
    /// Blocks whose writes fail.
    pub failing_writes: Vec<u8>,
    /// Keys accepted during authentication; empty accepts every key.
    pub accepted_keys: Vec<[u8; 6]>,
    /// Refuse every authentication attempt.
    pub refuse_auth: bool,
    /// Fail passive selection, as if the tag left the field.
    pub fail_select: bool,
    /// Answer to a RATS probe; `None` means the tag stays silent.
    pub ats: Option<Vec<u8>>,
    /// Fail attempts to toggle the RF field.
    pub fail_field_toggle: bool,
}

impl MockReader {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            calls: Vec::new(),
            memory: HashMap::new(),
            failing_reads: Vec::new(),
            failing_writes: Vec::new(),
            accepted_keys: Vec::new(),
            refuse_auth: false,
            fail_select: false,
            ats: None,
            fail_field_toggle: false,
        }
    }

    /// A MIFARE Classic 1K tag with a single size UID.
    pub fn classic_1k() -> Self {
        Self::new(Target {
            uid: Uid::from([0x01, 0x23, 0x45, 0x67]),
            atqa: [0x00, 0x04],
            sak: 0x08,
        })
    }

    /// A MIFARE Ultralight tag with a double size UID.
    pub fn ultralight() -> Self {
        Self::new(Target {
            uid: Uid::new(&[0x04, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6]).unwrap(),
            atqa: [0x00, 0x44],
            sak: 0x00,
        })
    }

    /// Fill blocks `0..=last_block` with a recognizable per-block pattern.
    pub fn fill_pattern(&mut self, last_block: u8) {
        for block in 0..=last_block {
            self.memory.insert(block, [block; 16]);
        }
    }

    /// The write calls recorded so far, in order.
    pub fn written_blocks(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Write { block, .. } => Some(*block),
                _ => None,
            })
            .collect()
    }

    /// The auth attempts recorded so far, as `(block, key)` pairs.
    pub fn auth_attempts(&self) -> Vec<(u8, [u8; 6])> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Auth { block, key, .. } => Some((*block, *key)),
                _ => None,
            })
            .collect()
    }
}

impl Reader for MockReader {
    fn select_passive_target(
        &mut self,
        _modulation: Modulation,
        uid: Option<&[u8]>,
    ) -> Result<Target, ReaderError> {
        self.calls.push(Call::Select {
            uid: uid.map(<[u8]>::to_vec),
        });
        if self.fail_select {
            Err(ReaderError::NoTarget)
        } else {
            Ok(self.target)
        }
    }

    fn do_transceive_raw(&mut self, tx: &[u8]) -> Result<Bytes, ReaderError> {
        self.calls.push(Call::Transceive { tx: tx.to_vec() });
        match &self.ats {
            Some(ats) => Ok(Bytes::copy_from_slice(ats)),
            None => Err(ReaderError::Transceive),
        }
    }

    fn mifare_command(
        &mut self,
        block: u8,
        command: MifareCommand<'_>,
    ) -> Result<Bytes, ReaderError> {
        match command {
            MifareCommand::AuthenticateA { key, .. } | MifareCommand::AuthenticateB { key, .. } => {
                self.calls.push(Call::Auth {
                    block,
                    opcode: command.opcode(),
                    key: *key,
                });
                let accepted = !self.refuse_auth
                    && (self.accepted_keys.is_empty() || self.accepted_keys.contains(key));
                if accepted {
                    Ok(Bytes::new())
                } else {
                    Err(ReaderError::Transceive)
                }
            }
            MifareCommand::Read => {
                self.calls.push(Call::Read { block });
                if self.failing_reads.contains(&block) {
                    Err(ReaderError::Transceive)
                } else {
                    let data = self.memory.get(&block).copied().unwrap_or([0u8; 16]);
                    Ok(Bytes::copy_from_slice(&data))
                }
            }
            MifareCommand::Write(data) => {
                self.calls.push(Call::Write { block, data: *data });
                if self.failing_writes.contains(&block) {
                    Err(ReaderError::Transceive)
                } else {
                    self.memory.insert(block, *data);
                    Ok(Bytes::new())
                }
            }
        }
    }

    fn set_property(&mut self, property: Property, enabled: bool) -> Result<(), ReaderError> {
        self.calls.push(Call::Property { property, enabled });
        if self.fail_field_toggle && property == Property::ActivateField {
            Err(ReaderError::Property(property))
        } else {
            Ok(())
        }
    }
}
