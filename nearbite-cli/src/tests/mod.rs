//! Shared test harness modules for the Nearbite CLI.

use super::*;
use crate::nearby::{
    CollaboratorBuilder, Collaborators, NearbyConfig, Origin, config_from_layers_for_test,
    run_nearby_with,
};
