pub mod sdk;
#[cfg(feature="system-emission_governor")]    pub mod emission_governor;
#[cfg(feature="system-production_lanes")]     pub mod production_lanes;
#[cfg(feature="system-offline_accumulation")] pub mod offline_accumulation;
