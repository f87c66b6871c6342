// src/modules/mod.rs
mod state_checker;

pub use state_checker::{
    ModuleStateChecker, RequiredCheck, RequiredModuleSet, StateScan, NO_ISSUES_MESSAGE,
    UNDESIRED_STATE_MESSAGE,
};
