//! Reference fixture tables.

/// Daily egg yield for the 30-day reference window, oldest first.
///
/// Hand-written weekly blocks that drift upwards; there is no formula behind
/// them. See [`crate::metrics::generator::EggYield::Parametric`] for windows
/// longer than this table.
pub const DAILY_EGG_YIELD: [u32; 30] = [
    82_500, 83_000, 82_800, 83_200, 82_900, 82_700, 82_600, // week 1
    83_500, 83_600, 83_400, 83_800, 83_700, 83_500, 83_400, // week 2
    84_000, 84_200, 84_100, 84_300, 84_200, 84_000, 83_900, // week 3
    84_500, 84_600, 84_400, 84_800, 84_700, 84_500, 84_400, // week 4
    84_900, 85_000,
];

/// Farm locations offered by the (decorative) farm selector.
pub const DEFAULT_FARMS: [&str; 3] = [
    "Farm A - Jakarta",
    "Farm B - Surabaya",
    "Farm C - Bandung",
];
