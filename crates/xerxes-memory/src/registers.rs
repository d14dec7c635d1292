//! Standard Xerxes register tables.
//!
//! Offsets are byte addresses in the device memory. `net_cycle_time_us` sits
//! above the read-only base but is stored with the non-volatile settings and
//! stays writable.

use crate::register::{Region, Register, RegisterDescriptor};

// Non-volatile: calibration and configuration.
pub const GAIN_PV0: Register<f32> = Register::new("gain_pv0", 0, Region::NonVolatile);
pub const GAIN_PV1: Register<f32> = Register::new("gain_pv1", 4, Region::NonVolatile);
pub const GAIN_PV2: Register<f32> = Register::new("gain_pv2", 8, Region::NonVolatile);
pub const GAIN_PV3: Register<f32> = Register::new("gain_pv3", 12, Region::NonVolatile);
pub const OFFSET_PV0: Register<f32> = Register::new("offset_pv0", 16, Region::NonVolatile);
pub const OFFSET_PV1: Register<f32> = Register::new("offset_pv1", 20, Region::NonVolatile);
pub const OFFSET_PV2: Register<f32> = Register::new("offset_pv2", 24, Region::NonVolatile);
pub const OFFSET_PV3: Register<f32> = Register::new("offset_pv3", 28, Region::NonVolatile);
pub const DESIRED_CYCLE_TIME: Register<u32> = Register::new("desired_cycle_time", 32, Region::NonVolatile);
pub const CONFIG: Register<u8> = Register::new("config", 40, Region::NonVolatile);
pub const DEVICE_ADDRESS: Register<u8> = Register::new("device_address", 44, Region::NonVolatile);
pub const NET_CYCLE_TIME_US: Register<u32> = Register::new("net_cycle_time_us", 544, Region::NonVolatile);

pub const NON_VOLATILE: &[RegisterDescriptor] = &[
    GAIN_PV0.descriptor(),
    GAIN_PV1.descriptor(),
    GAIN_PV2.descriptor(),
    GAIN_PV3.descriptor(),
    OFFSET_PV0.descriptor(),
    OFFSET_PV1.descriptor(),
    OFFSET_PV2.descriptor(),
    OFFSET_PV3.descriptor(),
    DESIRED_CYCLE_TIME.descriptor(),
    CONFIG.descriptor(),
    DEVICE_ADDRESS.descriptor(),
    NET_CYCLE_TIME_US.descriptor(),
];

// Volatile: live process values and statistics.
pub const PV0: Register<f32> = Register::new("pv0", 256, Region::Volatile);
pub const PV1: Register<f32> = Register::new("pv1", 260, Region::Volatile);
pub const PV2: Register<f32> = Register::new("pv2", 264, Region::Volatile);
pub const PV3: Register<f32> = Register::new("pv3", 268, Region::Volatile);
pub const MEAN_PV0: Register<f32> = Register::new("mean_pv0", 272, Region::Volatile);
pub const MEAN_PV1: Register<f32> = Register::new("mean_pv1", 276, Region::Volatile);
pub const MEAN_PV2: Register<f32> = Register::new("mean_pv2", 280, Region::Volatile);
pub const MEAN_PV3: Register<f32> = Register::new("mean_pv3", 284, Region::Volatile);
pub const STD_DEV_PV0: Register<f32> = Register::new("std_dev_pv0", 288, Region::Volatile);
pub const STD_DEV_PV1: Register<f32> = Register::new("std_dev_pv1", 292, Region::Volatile);
pub const STD_DEV_PV2: Register<f32> = Register::new("std_dev_pv2", 296, Region::Volatile);
pub const STD_DEV_PV3: Register<f32> = Register::new("std_dev_pv3", 300, Region::Volatile);
pub const MIN_PV0: Register<f32> = Register::new("min_pv0", 304, Region::Volatile);
pub const MIN_PV1: Register<f32> = Register::new("min_pv1", 308, Region::Volatile);
pub const MIN_PV2: Register<f32> = Register::new("min_pv2", 312, Region::Volatile);
pub const MIN_PV3: Register<f32> = Register::new("min_pv3", 316, Region::Volatile);
pub const MAX_PV0: Register<f32> = Register::new("max_pv0", 320, Region::Volatile);
pub const MAX_PV1: Register<f32> = Register::new("max_pv1", 324, Region::Volatile);
pub const MAX_PV2: Register<f32> = Register::new("max_pv2", 328, Region::Volatile);
pub const MAX_PV3: Register<f32> = Register::new("max_pv3", 332, Region::Volatile);
pub const DV0: Register<u32> = Register::new("dv0", 336, Region::Volatile);
pub const DV1: Register<u32> = Register::new("dv1", 340, Region::Volatile);
pub const DV2: Register<u32> = Register::new("dv2", 344, Region::Volatile);
pub const DV3: Register<u32> = Register::new("dv3", 348, Region::Volatile);
pub const MEMORY_LOCK: Register<u32> = Register::new("memory_lock", 384, Region::Volatile);

pub const VOLATILE: &[RegisterDescriptor] = &[
    PV0.descriptor(),
    PV1.descriptor(),
    PV2.descriptor(),
    PV3.descriptor(),
    MEAN_PV0.descriptor(),
    MEAN_PV1.descriptor(),
    MEAN_PV2.descriptor(),
    MEAN_PV3.descriptor(),
    STD_DEV_PV0.descriptor(),
    STD_DEV_PV1.descriptor(),
    STD_DEV_PV2.descriptor(),
    STD_DEV_PV3.descriptor(),
    MIN_PV0.descriptor(),
    MIN_PV1.descriptor(),
    MIN_PV2.descriptor(),
    MIN_PV3.descriptor(),
    MAX_PV0.descriptor(),
    MAX_PV1.descriptor(),
    MAX_PV2.descriptor(),
    MAX_PV3.descriptor(),
    DV0.descriptor(),
    DV1.descriptor(),
    DV2.descriptor(),
    DV3.descriptor(),
    MEMORY_LOCK.descriptor(),
];

// Read-only: device state.
pub const STATUS: Register<u64> = Register::new("status", 512, Region::ReadOnly);
pub const ERROR: Register<u64> = Register::new("error", 520, Region::ReadOnly);
pub const UID: Register<u64> = Register::new("uid", 528, Region::ReadOnly);

pub const READ_ONLY: &[RegisterDescriptor] = &[
    STATUS.descriptor(),
    ERROR.descriptor(),
    UID.descriptor(),
];
