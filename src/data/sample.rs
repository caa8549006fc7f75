use super::model::{Island, Penguin, PenguinDataset, Sex, Species};

/// Seed used for the dataset shown when no file is given.
pub const DEFAULT_SEED: u64 = 42;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Per-species generation profile: (mean, std dev) of each measurement.
struct Profile {
    species: Species,
    count: usize,
    islands: &'static [Island],
    bill_length: (f64, f64),
    bill_depth: (f64, f64),
    flipper_length: (f64, f64),
    body_mass: (f64, f64),
}

const PROFILES: [Profile; 3] = [
    Profile {
        species: Species::Adelie,
        count: 152,
        islands: &[Island::Biscoe, Island::Dream, Island::Torgersen],
        bill_length: (38.8, 2.7),
        bill_depth: (18.3, 1.2),
        flipper_length: (190.0, 6.5),
        body_mass: (3700.0, 460.0),
    },
    Profile {
        species: Species::Gentoo,
        count: 124,
        islands: &[Island::Biscoe],
        bill_length: (47.5, 3.1),
        bill_depth: (15.0, 1.0),
        flipper_length: (217.0, 6.5),
        body_mass: (5076.0, 504.0),
    },
    Profile {
        species: Species::Chinstrap,
        count: 68,
        islands: &[Island::Dream],
        bill_length: (48.8, 3.3),
        bill_depth: (18.4, 1.1),
        flipper_length: (196.0, 7.1),
        body_mass: (3733.0, 384.0),
    },
];

/// Round `v` to a multiple of `step`. Fractional steps divide by the integral
/// scale so tenths come out as 38.3, not 38.300000000000004.
fn round_to(v: f64, step: f64) -> f64 {
    if step < 1.0 {
        let scale = (1.0 / step).round();
        (v * scale).round() / scale
    } else {
        (v / step).round() * step
    }
}

/// Generate a penguin-shaped dataset (344 rows, three species) from `seed`.
///
/// Every 60th row has no measurements at all and every 25th row has no sex
/// recorded, so the missing-value paths are always exercised.
pub fn synthetic_penguins(seed: u64) -> PenguinDataset {
    let mut rng = SimpleRng::new(seed);
    let mut rows = Vec::new();

    for profile in &PROFILES {
        for _ in 0..profile.count {
            let row_id = rows.len();
            let sex = if rng.next_f64() < 0.5 { Sex::Female } else { Sex::Male };
            // Males run a little larger in every measurement.
            let scale = if sex == Sex::Male { 1.0 } else { -1.0 };
            let mut sample = |(mean, sd): (f64, f64), step: f64| {
                round_to(rng.gauss(mean + scale * sd * 0.5, sd * 0.85), step)
            };

            let bill_length = sample(profile.bill_length, 0.1);
            let bill_depth = sample(profile.bill_depth, 0.1);
            let flipper_length = sample(profile.flipper_length, 1.0);
            let body_mass = sample(profile.body_mass, 25.0);
            let island = rng.pick(profile.islands);
            let year = rng.pick(&[2007, 2008, 2009]);

            let measured = row_id % 60 != 3;
            rows.push(Penguin {
                species: profile.species,
                island,
                bill_length_mm: measured.then_some(bill_length),
                bill_depth_mm: measured.then_some(bill_depth),
                flipper_length_mm: measured.then_some(flipper_length),
                body_mass_g: measured.then_some(body_mass),
                sex: (measured && row_id % 25 != 7).then_some(sex),
                year: Some(year),
            });
        }
    }

    PenguinDataset::from_rows(rows)
}
