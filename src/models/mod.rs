pub mod comparison;
pub mod config;
pub mod observation;

pub use comparison::{
    MergedRftRecord, MergedRftRow, MergedRftTable, ObservedRftPoint, RftKey, SimulatedRftRecord,
    SimulatedRftTable,
};
pub use config::{GenerationConfig, ObservationConfig};
pub use observation::{
    ObservationData, ObservationGroup, ObservationType, RftObservations, RftPoint, RftSubtype,
    RftWellObservation, SummaryObservation, SummaryVector, WellPosition,
};
