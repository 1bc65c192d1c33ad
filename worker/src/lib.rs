mod trainer;

pub use trainer::LocalTrainer;
