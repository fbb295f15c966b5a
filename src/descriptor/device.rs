//! Device descriptor store
//!
//! [`DeviceBuilder`] accumulates the self-description a device sends
//! during sync; [`DeviceDescriptor`] is the frozen result handed to the
//! port facade. The builder is deliberately order-tolerant: INFO frames
//! may arrive in any order, duplicates overwrite, and anything addressed
//! past the declared mode count is dropped.

use heapless::Vec;

use crate::descriptor::mode::{MODE_FLAGS_LEN, ModeDescriptor, Range};
use crate::error::{ProtocolError, ProtocolResult};
use crate::proto::msg::{DataType, MAX_MODES, MAX_NAME_LEN, SHORT_NAME_LEN, info, type_id};

/// Maximum number of mode combinations a device can advertise.
pub const MAX_COMBOS: usize = 8;

/// Frozen self-description of an attached device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDescriptor {
    /// LEGO device type id
    pub type_id: u16,
    /// Firmware version (raw BCD word)
    pub fw_version: u32,
    /// Hardware version (raw BCD word)
    pub hw_version: u32,
    /// Number of views (modes shown in port monitoring tools)
    pub num_views: u8,
    /// Mode combination bitmasks
    pub combos: Vec<u16, MAX_COMBOS>,
    /// Mode the driver selects after sync
    pub default_mode: u8,
    modes: Vec<ModeDescriptor, MAX_MODES>,
}

impl DeviceDescriptor {
    /// Number of modes the device declared.
    #[must_use]
    pub fn num_modes(&self) -> u8 {
        self.modes.len() as u8
    }

    /// Descriptor for one mode.
    #[must_use]
    pub fn mode(&self, index: u8) -> Option<&ModeDescriptor> {
        self.modes.get(index as usize)
    }

    /// All mode descriptors, indexed by mode.
    #[must_use]
    pub fn modes(&self) -> &[ModeDescriptor] {
        &self.modes
    }
}

/// Mode the driver should select right after sync for a known device
/// type, clamped into the declared mode range.
///
/// Motors idle in their position/calibration reporting modes; the color
/// sensor starts on its combined RGB mode. Unknown devices get mode 0.
#[must_use]
pub fn default_mode_for(type_id_value: u16, num_modes: u8) -> u8 {
    let preferred = match type_id_value {
        type_id::COLOR_DISTANCE_SENSOR => 6,
        type_id::INTERACTIVE_MOTOR => 2,
        type_id::TECHNIC_LARGE_MOTOR | type_id::TECHNIC_XL_MOTOR => 4,
        _ => 0,
    };
    if preferred < num_modes { preferred } else { 0 }
}

/// Accumulates the sync sweep into a [`DeviceDescriptor`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    type_id: Option<u16>,
    fw_version: u32,
    hw_version: u32,
    declared_modes: u8,
    num_views: u8,
    combos: Vec<u16, MAX_COMBOS>,
    modes: Vec<ModeDescriptor, MAX_MODES>,
}

impl DeviceBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Device type id from the TYPE announcement, if seen.
    #[must_use]
    pub fn type_id(&self) -> Option<u16> {
        self.type_id
    }

    /// Record the TYPE announcement.
    pub fn set_type(&mut self, id: u8) {
        self.type_id = Some(u16::from(id));
    }

    /// Record the VERSION payload (two little-endian words: fw, hw).
    ///
    /// # Errors
    ///
    /// `BadPayload` unless the payload is exactly 8 bytes.
    pub fn set_versions(&mut self, payload: &[u8]) -> ProtocolResult<()> {
        if payload.len() != 8 {
            return Err(ProtocolError::BadPayload);
        }
        self.fw_version = le_u32(&payload[0..4]);
        self.hw_version = le_u32(&payload[4..8]);
        Ok(())
    }

    /// Apply a MODES declaration.
    ///
    /// The payload carries `count - 1` values: mode and view counts, and
    /// for Powered Up devices a second pair that extends past 8 modes.
    /// A re-declaration may only grow the mode set.
    ///
    /// # Errors
    ///
    /// `BadPayload` for a malformed payload, `ModesShrunk` when a second
    /// declaration is smaller than the first.
    pub fn declare_modes(&mut self, payload: &[u8]) -> ProtocolResult<()> {
        if payload.len() < 2 {
            return Err(ProtocolError::BadPayload);
        }
        let (modes, views) = if payload.len() >= 4 {
            (usize::from(payload[2]) + 1, usize::from(payload[3]) + 1)
        } else {
            (usize::from(payload[0]) + 1, usize::from(payload[1]) + 1)
        };
        if modes > MAX_MODES {
            return Err(ProtocolError::BadPayload);
        }
        if self.declared_modes != 0 && modes < usize::from(self.declared_modes) {
            return Err(ProtocolError::ModesShrunk);
        }

        self.declared_modes = modes as u8;
        self.num_views = views as u8;
        while self.modes.len() < modes {
            let _ = self.modes.push(ModeDescriptor::default());
        }
        Ok(())
    }

    /// Number of modes declared so far.
    #[must_use]
    pub fn declared_modes(&self) -> u8 {
        self.declared_modes
    }

    /// Dispatch one INFO frame into the mode table.
    ///
    /// Frames for modes past the declared count are ignored; duplicate
    /// sub-kinds overwrite the previous value.
    ///
    /// # Errors
    ///
    /// `BadPayload` when a payload does not fit its sub-kind.
    pub fn apply_info(&mut self, mode: u8, sub: u8, payload: &[u8]) -> ProtocolResult<()> {
        if mode >= self.declared_modes {
            return Ok(());
        }
        // declare_modes pre-filled the table up to the declared count
        let Some(slot) = self.modes.get_mut(mode as usize) else {
            return Ok(());
        };

        match sub {
            info::NAME => {
                if payload.len() > MAX_NAME_LEN {
                    // Long layout: short name + capability flag bytes
                    if payload.len() < SHORT_NAME_LEN + MODE_FLAGS_LEN {
                        return Err(ProtocolError::BadPayload);
                    }
                    set_ascii(&mut slot.name, &payload[..SHORT_NAME_LEN]);
                    slot.flags
                        .copy_from_slice(&payload[SHORT_NAME_LEN..SHORT_NAME_LEN + MODE_FLAGS_LEN]);
                } else {
                    set_ascii(&mut slot.name, payload);
                }
            }
            info::RAW => slot.raw = range_of(payload)?,
            info::PCT => slot.pct = range_of(payload)?,
            info::SI => slot.si = range_of(payload)?,
            info::CALIB => slot.calib = range_of(payload)?,
            info::SYMBOL => set_ascii(&mut slot.symbol, payload),
            info::MAPPING => {
                if payload.len() < 2 {
                    return Err(ProtocolError::BadPayload);
                }
                slot.mapping_in = payload[0];
                slot.mapping_out = payload[1];
            }
            info::MODE_COMBOS => {
                self.combos.clear();
                for pair in payload.chunks_exact(2) {
                    let combo = u16::from_le_bytes([pair[0], pair[1]]);
                    if combo != 0 {
                        let _ = self.combos.push(combo);
                    }
                }
            }
            info::FORMAT => {
                if payload.len() < 4 {
                    return Err(ProtocolError::BadPayload);
                }
                slot.num_values = payload[0];
                slot.data_type = DataType::from_raw(payload[1])?;
                slot.digits = payload[2];
                slot.decimals = payload[3];
                slot.has_format = true;
            }
            // Motor calibration blobs and future sub-kinds: accept silently
            _ => {}
        }
        Ok(())
    }

    /// Freeze the builder into a descriptor.
    ///
    /// # Errors
    ///
    /// `UnexpectedFrame` when no TYPE announcement was seen,
    /// `MissingFormat` unless every declared mode received FORMAT.
    pub fn finalize(self) -> ProtocolResult<DeviceDescriptor> {
        let Some(type_id_value) = self.type_id else {
            return Err(ProtocolError::UnexpectedFrame);
        };
        if self.declared_modes == 0 || self.modes.len() != self.declared_modes as usize {
            return Err(ProtocolError::MissingFormat);
        }
        if !self.modes.iter().all(ModeDescriptor::is_complete) {
            return Err(ProtocolError::MissingFormat);
        }

        let default_mode = default_mode_for(type_id_value, self.declared_modes);
        Ok(DeviceDescriptor {
            type_id: type_id_value,
            fw_version: self.fw_version,
            hw_version: self.hw_version,
            num_views: self.num_views,
            combos: self.combos,
            default_mode,
            modes: self.modes,
        })
    }
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn range_of(payload: &[u8]) -> ProtocolResult<Range> {
    if payload.len() != 8 {
        return Err(ProtocolError::BadPayload);
    }
    Ok(Range::new(
        f32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]),
        f32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]),
    ))
}

/// Copy a NUL-terminated ASCII field, dropping non-printable bytes.
fn set_ascii<const N: usize>(dest: &mut heapless::String<N>, bytes: &[u8]) {
    dest.clear();
    for &b in bytes {
        if b == 0 {
            break;
        }
        if (0x20..0x7F).contains(&b) {
            let _ = dest.push(b as char);
        }
    }
}
