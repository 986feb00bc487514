use hmi_core::base::{ErrorException, ErrorInfo};
use hmi_core::plugin_system::Plugin;
use serde_json::json;

/// Print a numbered initialization order
pub fn print_load_order(header: &str, order: &[String]) {
    println!("{}", header);
    for (position, name) in order.iter().enumerate() {
        println!("  {}. {}", position + 1, name);
    }
}

pub fn print_load_order_json(order: &[String]) {
    println!("{}", json!({ "load_order": order }));
}

/// Print registered plugins in declaration order
pub fn print_plugins(plugins: &[&Plugin]) {
    if plugins.is_empty() {
        println!("No plugins registered.");
        return;
    }
    println!("Registered plugins:");
    for plugin in plugins {
        println!("  - Name: {}, Version: {}, Location: {}", plugin.name(), plugin.version(), plugin.location());
    }
}

pub fn print_plugins_json(plugins: &[&Plugin]) {
    println!("{}", json!({ "plugins": plugins }));
}

/// Report a failure on stderr: kind, message, context and the nested causes
pub fn print_error(err: &ErrorException) {
    let info = err.info();
    eprintln!("Error [{}]: {}", info.kind(), err.message());
    if let Some(context) = info.context() {
        eprintln!("  in: {}", context);
    }
    for cause in err.causes().iter().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
}

pub fn print_error_json(err: &ErrorException) {
    let causes: Vec<&ErrorInfo> = err.causes().into_iter().skip(1).collect();
    println!("{}", json!({ "error": err.info(), "causes": causes }));
}
