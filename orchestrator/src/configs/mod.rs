mod run;

pub use run::RunConfig;
