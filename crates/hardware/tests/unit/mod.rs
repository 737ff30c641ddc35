//! # Unit Components
//!
//! This module serves as the central hub for the component tests. It organizes
//! them the way the library is organized: shared types, ISA, loader and
//! reporting, the scheduling core, configuration and statistics.
