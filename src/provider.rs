//! In-process linker tools.
//!
//! The platform's tool-provider seam, expressed as a trait: a tool
//! registered under a name can be invoked synchronously with a true
//! argument array and two capture sinks, no subprocess involved.

use std::io::Write;

/// An in-process tool. `run` blocks until the tool finishes and returns its
/// exit code; all output goes through the two sinks.
pub trait LinkerTool {
    fn name(&self) -> &str;
    fn run(&self, out: &mut dyn Write, err: &mut dyn Write, args: &[String]) -> i32;
}

/// Registry of in-process tools, probed once at startup.
#[derive(Default)]
pub struct ToolProviderRegistry {
    tools: Vec<Box<dyn LinkerTool>>,
}

impl ToolProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Box<dyn LinkerTool>) {
        self.tools.push(tool);
    }

    /// First registered tool with the given name.
    pub fn find_first(&self, name: &str) -> Option<&dyn LinkerTool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }
}
