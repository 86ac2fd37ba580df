//! The code being measured.
//!
//! The kernels are small and deterministic. Their results are never used, but every result is
//! passed through [black_box] so the optimizer can't remove the work the counters are supposed to
//! observe.

use core::hint::black_box;

/// Number of elements in each of the mixed workload's arrays.
pub const ARRAY_SIZE: usize = 8;
/// Seed of the integer section's pseudo-random sequence.
pub const RAND_SEED: u32 = 1234;
/// How far the Fibonacci kernel iterates.
pub const FIBONACCI_N: u32 = 12;

/// Inputs of the float reduction.
pub const FLOAT_VALUES: [f32; ARRAY_SIZE] = [1.5, 2.0, -0.5, 3.25, 4.0, 0.0, -1.0, 2.75];
/// Inputs of the double reduction.
pub const DOUBLE_VALUES: [f64; ARRAY_SIZE] = [1.1, 1.5, 2.0, 0.5, 1.25, 2.25, 1.0, 1.2];
/// The string copied by the string section, including its terminator.
pub const MESSAGE: [u8; 5] = *b"cva6\0";

/// Something to measure.
pub trait Workload {
    fn run(&mut self);
}

impl<F: FnMut()> Workload for F {
    fn run(&mut self) {
        self()
    }
}

/// Does nothing, so a run measures only the cost of the measurement itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyWorkload;

impl Workload for EmptyWorkload {
    #[inline(always)]
    fn run(&mut self) {}
}

/// One step of a linear congruential generator (the Numerical Recipes constants), with 32-bit
/// wrapping arithmetic.
#[inline(never)]
pub fn rand32(seed: u32) -> u32 {
    seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

/// The `n`th Fibonacci number, with `fibonacci(0) == 0` and `fibonacci(1) == 1`.
#[inline(never)]
pub fn fibonacci(n: u32) -> u32 {
    let (mut a, mut b) = (0u32, 1u32);
    for _ in 0..n {
        let t = a.wrapping_add(b);
        a = b;
        b = t;
    }
    a
}

/// Reverses the byte order of `x`, spelled out with shifts and masks so that the workload executes
/// the same instructions on cores without a byte-swap instruction.
#[inline(never)]
pub fn reverse_bytes(x: u32) -> u32 {
    ((x >> 24) & 0x0000_00FF)
        | ((x >> 8) & 0x0000_FF00)
        | ((x << 8) & 0x00FF_0000)
        | ((x << 24) & 0xFF00_0000)
}

/// Sums `values` from left to right, starting at zero.
#[inline(never)]
pub fn float_sum(values: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for v in values {
        sum += *v;
    }
    sum
}

/// Multiplies `values` from left to right, starting at one.
#[inline(never)]
pub fn double_product(values: &[f64]) -> f64 {
    let mut prod = 1.0f64;
    for v in values {
        prod *= *v;
    }
    prod
}

/// Fills `out` with successive [rand32] values, starting from `seed`.
pub fn fill_random(seed: u32, out: &mut [u32]) {
    let mut seed = seed;
    for slot in out.iter_mut() {
        seed = rand32(seed);
        *slot = seed;
    }
}

/// XORs all `values` together.
pub fn xor_checksum(values: &[u32]) -> u32 {
    values.iter().fold(0, |acc, v| acc ^ v)
}

/// Everything the mixed workload computes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixedOutputs {
    pub random: [u32; ARRAY_SIZE],
    pub fibonacci: u32,
    pub checksum: u32,
    pub reversed_checksum: u32,
    pub float_sum: f32,
    pub double_product: f64,
    pub message_copy: [u8; 5],
}

/// A short mix of integer, floating-point and memory-copy work.
#[derive(Debug, Default, Clone, Copy)]
pub struct MixedWorkload;

impl MixedWorkload {
    /// Runs every section once and returns what they computed.
    pub fn run_once(&self) -> MixedOutputs {
        // Integer section.
        let mut random = [0u32; ARRAY_SIZE];
        fill_random(black_box(RAND_SEED), &mut random);
        let fibonacci = fibonacci(black_box(FIBONACCI_N));
        let checksum = xor_checksum(black_box(&random));
        let reversed_checksum = reverse_bytes(checksum);

        // Floating-point section. The inputs live on the stack like any other local array.
        let fvalues = black_box(FLOAT_VALUES);
        let dvalues = black_box(DOUBLE_VALUES);
        let float_sum = float_sum(&fvalues);
        let double_product = double_product(&dvalues);

        // String section.
        let message = black_box(MESSAGE);
        let mut message_copy = [0u8; 5];
        message_copy.copy_from_slice(&message);

        MixedOutputs {
            random: black_box(random),
            fibonacci: black_box(fibonacci),
            checksum: black_box(checksum),
            reversed_checksum: black_box(reversed_checksum),
            float_sum: black_box(float_sum),
            double_product: black_box(double_product),
            message_copy: black_box(message_copy),
        }
    }
}

impl Workload for MixedWorkload {
    fn run(&mut self) {
        black_box(self.run_once());
    }
}
