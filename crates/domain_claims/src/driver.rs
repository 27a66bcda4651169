//! Driver details quoted in dispatch messages

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const DRIVER_NAMES: [&str; 6] = [
    "Mike Johnson",
    "Sarah Wilson",
    "David Chen",
    "Maria Garcia",
    "James Smith",
    "Lisa Brown",
];

const SERVICE_VEHICLES: [&str; 5] = [
    "White Ford Transit",
    "Blue Chevy Express",
    "Red Toyota Tundra",
    "Black Ram ProMaster",
    "Silver Ford F-150",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverProfile {
    pub name: String,
    pub phone: String,
    pub vehicle: String,
}

/// Supplies the driver assigned to a dispatch
pub trait DriverProfileSource: Send + Sync {
    fn next_profile(&self) -> DriverProfile;
}

/// Simulated roster that draws a random driver, phone and vehicle
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDriverProfiles;

impl DriverProfileSource for RandomDriverProfiles {
    fn next_profile(&self) -> DriverProfile {
        let mut rng = rand::thread_rng();
        let name = DRIVER_NAMES.choose(&mut rng).copied().unwrap_or(DRIVER_NAMES[0]);
        let vehicle = SERVICE_VEHICLES
            .choose(&mut rng)
            .copied()
            .unwrap_or(SERVICE_VEHICLES[0]);
        let phone = format!(
            "({}) {}-{}",
            rng.gen_range(100..=999),
            rng.gen_range(100..=999),
            rng.gen_range(1000..=9999)
        );

        DriverProfile {
            name: name.to_string(),
            phone,
            vehicle: vehicle.to_string(),
        }
    }
}

/// Always the same driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDriverProfile(pub DriverProfile);

impl DriverProfileSource for FixedDriverProfile {
    fn next_profile(&self) -> DriverProfile {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_profile_shape() {
        for _ in 0..20 {
            let profile = RandomDriverProfiles.next_profile();
            assert!(DRIVER_NAMES.contains(&profile.name.as_str()));
            assert!(SERVICE_VEHICLES.contains(&profile.vehicle.as_str()));
            assert_eq!(profile.phone.len(), "(555) 123-4567".len());
            assert!(profile.phone.starts_with('('));
        }
    }

    #[test]
    fn test_fixed_profile() {
        let profile = DriverProfile {
            name: "Maria Garcia".to_string(),
            phone: "(415) 555-1234".to_string(),
            vehicle: "Red Toyota Tundra".to_string(),
        };
        assert_eq!(FixedDriverProfile(profile.clone()).next_profile(), profile);
    }
}
