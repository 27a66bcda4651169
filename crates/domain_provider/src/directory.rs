//! Provider directory
//!
//! Directory order matters: selection ties are broken in favour of the
//! provider listed first.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;

use core_kernel::Money;
use domain_policy::ServiceType;

use crate::provider::{ProviderCategory, ServiceProvider};

/// Read-only access to the provider roster
pub trait ProviderDirectory: Send + Sync {
    /// All providers, in directory order
    fn providers(&self) -> Vec<ServiceProvider>;

    fn get(&self, id: &str) -> Option<ServiceProvider> {
        self.providers().into_iter().find(|provider| provider.id == id)
    }

    /// Providers able to perform `service`, in directory order
    fn capable_of(&self, service: ServiceType) -> Vec<ServiceProvider> {
        self.providers()
            .into_iter()
            .filter(|provider| provider.supports(service))
            .collect()
    }

    /// First listed provider of a category
    fn first_in_category(&self, category: ProviderCategory) -> Option<ServiceProvider> {
        self.providers()
            .into_iter()
            .find(|provider| provider.category == category)
    }
}

/// Immutable roster held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderDirectory {
    providers: Vec<ServiceProvider>,
}

impl InMemoryProviderDirectory {
    pub fn new(providers: Vec<ServiceProvider>) -> Self {
        Self { providers }
    }

    /// Dispatch roster used by the claim submission path
    pub fn seeded() -> Self {
        use ServiceType::*;

        Self::new(vec![
            provider("SP-001", "QuickFix Towing", ProviderCategory::Towing, "(555) 111-2222",
                dec!(4.8), 15, dec!(2.1), dec!(85), &[Towing]),
            provider("SP-002", "Reliable Roadside", ProviderCategory::Towing, "(555) 333-4444",
                dec!(4.6), 25, dec!(4.3), dec!(75), &[Towing]),
            provider("SP-003", "Auto Rescue Pro", ProviderCategory::Mechanic, "(555) 555-6666",
                dec!(4.9), 20, dec!(3.1), dec!(95), &[BatteryJump, TireChange, RoadsideRepair]),
            provider("SP-004", "Emergency Lock Service", ProviderCategory::Locksmith, "(555) 777-8888",
                dec!(4.7), 18, dec!(2.8), dec!(60), &[Lockout]),
            provider("SP-005", "FastFuel Delivery", ProviderCategory::FuelDelivery, "(555) 999-0000",
                dec!(4.5), 12, dec!(1.5), dec!(45), &[FuelDelivery]),
        ])
    }

    /// Roster shown on the agent dashboard
    pub fn dashboard_roster() -> Self {
        use ServiceType::*;

        Self::new(vec![
            provider("SP-001", "QuickFix Towing", ProviderCategory::Towing, "(555) 123-4567",
                dec!(4.8), 25, dec!(3.2), dec!(85), &[Towing, TireChange]),
            provider("SP-002", "Metro Auto Repair", ProviderCategory::Mechanic, "(555) 234-5678",
                dec!(4.6), 35, dec!(4.1), dec!(95), &[BatteryJump, RoadsideRepair]),
            provider("SP-003", "FastKey Locksmith", ProviderCategory::Locksmith, "(555) 345-6789",
                dec!(4.9), 20, dec!(2.8), dec!(75), &[Lockout]),
            provider("SP-004", "Emergency Fuel", ProviderCategory::FuelDelivery, "(555) 456-7890",
                dec!(4.7), 30, dec!(5.0), dec!(45), &[FuelDelivery]),
        ])
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ProviderDirectory for InMemoryProviderDirectory {
    fn providers(&self) -> Vec<ServiceProvider> {
        self.providers.clone()
    }
}

#[allow(clippy::too_many_arguments)]
fn provider(
    id: &str,
    name: &str,
    category: ProviderCategory,
    phone: &str,
    rating: Decimal,
    response_time_minutes: u32,
    distance_miles: Decimal,
    base_cost: Decimal,
    services: &[ServiceType],
) -> ServiceProvider {
    ServiceProvider {
        id: id.to_string(),
        name: name.to_string(),
        category,
        phone: phone.to_string(),
        rating,
        response_time_minutes,
        distance_miles,
        base_cost: Money::usd(base_cost),
        services: services.iter().copied().collect::<BTreeSet<_>>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capable_of_preserves_directory_order() {
        let directory = InMemoryProviderDirectory::seeded();
        let towing: Vec<String> = directory
            .capable_of(ServiceType::Towing)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(towing, vec!["SP-001", "SP-002"]);
    }

    #[test]
    fn test_every_service_has_a_seeded_provider() {
        let directory = InMemoryProviderDirectory::seeded();
        for service in ServiceType::ALL {
            assert!(
                !directory.capable_of(service).is_empty(),
                "no provider for {service}"
            );
        }
    }

    #[test]
    fn test_dashboard_first_in_category() {
        let directory = InMemoryProviderDirectory::dashboard_roster();
        let mechanic = directory.first_in_category(ProviderCategory::Mechanic).unwrap();
        assert_eq!(mechanic.name, "Metro Auto Repair");
        assert!(directory.first_in_category(ProviderCategory::Roadside).is_none());
    }

    #[test]
    fn test_get_by_id() {
        let directory = InMemoryProviderDirectory::seeded();
        assert_eq!(directory.get("SP-004").unwrap().name, "Emergency Lock Service");
        assert!(directory.get("SP-999").is_none());
    }
}
