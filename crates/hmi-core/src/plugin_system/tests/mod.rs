
pub mod manager_tests;
pub mod manifest_tests;
pub mod node_tests;
pub mod version_tests;
