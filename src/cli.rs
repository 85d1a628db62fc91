use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::{output, server, tools};

#[derive(Parser)]
#[command(name = "gitlab-ci-mcp")]
#[command(version, about = "GitLab CI jobs and console logs over MCP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a tool directly and print its output
    Test {
        #[command(subcommand)]
        tool: TestTool,
    },
}

#[derive(Subcommand)]
enum TestTool {
    /// List CI jobs for the current commit
    CommitJobs,

    /// Fetch the console log of a job
    JobLog {
        /// Job id
        job_id: String,
    },
}

impl Cli {
    /// Dispatches the parsed invocation: the MCP server when no subcommand is
    /// given, otherwise the requested test tool.
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            None => server::serve().await,
            Some(Commands::Test { tool }) => {
                output::print_banner();
                match tool {
                    TestTool::CommitJobs => {
                        println!("{}", tools::get_current_commit_jobs().await);
                    }
                    // Non-numeric ids are rejected before any network call.
                    TestTool::JobLog { job_id } => match job_id.parse::<u64>() {
                        Ok(id) => println!("{}", tools::get_job_log(id).await),
                        Err(_) => println!("Invalid job id '{job_id}': expected an integer."),
                    },
                }

                Ok(())
            }
        }
    }
}
