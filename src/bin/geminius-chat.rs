//! Interactive chat application for conversing with Gemini.
//!
//! This binary provides a streaming REPL interface for chatting with
//! Gemini models via the Google Generative Language API.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! geminius-chat
//!
//! # Specify a model
//! geminius-chat --model gemini-2.5-pro
//!
//! # Set a system instruction
//! geminius-chat --system "You are a helpful coding assistant"
//!
//! # Disable colors (useful for piping output)
//! geminius-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/model <name>` - Change the model
//! - `/models` - List the model catalog
//! - `/attach <path>` - Stage an image for the next message
//! - `/system [instruction]` - Set or restore the system instruction
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use geminius::Gemini;
use geminius::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use geminius::types::{Model, catalog};

/// Main entry point for the geminius-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("geminius-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = Gemini::new(None)?;
    let mut session = ChatSession::new(client, config);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Gemini Chat (model: {})", session.model());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Model(model_name) => {
                            let model = model_name
                                .parse()
                                .unwrap_or_else(|_| Model::Custom(model_name.clone()));
                            session.set_model(model);
                            renderer.print_info(&format!("Model changed to: {}", model_name));
                        }
                        ChatCommand::Models => {
                            print_catalog(&session);
                        }
                        ChatCommand::System(instruction) => {
                            session.set_system_instruction(instruction.clone());
                            match instruction {
                                Some(i) => renderer
                                    .print_info(&format!("System instruction set to: {}", i)),
                                None => {
                                    renderer.print_info("System instruction reset to default.")
                                }
                            }
                        }
                        ChatCommand::Attach(path) => match session.attach_file(&path) {
                            Ok(_) => {
                                renderer.print_info(&format!(
                                    "Attached {} ({})",
                                    path,
                                    session
                                        .pending_attachment()
                                        .map(|a| a.mime_type.as_str())
                                        .unwrap_or("unknown")
                                ));
                            }
                            Err(err) => {
                                renderer.print_error(&format!("Failed to attach {}: {}", path, err))
                            }
                        },
                        ChatCommand::Detach => {
                            if session.drop_attachment() {
                                renderer.print_info("Attachment dropped.");
                            } else {
                                renderer.print_info("No attachment staged.");
                            }
                        }
                        ChatCommand::MaxTokens(value) => {
                            session.set_max_output_tokens(Some(value));
                            renderer.print_info(&format!("max_output_tokens set to {value}"));
                        }
                        ChatCommand::Temperature(value) => {
                            session.set_temperature(Some(value));
                            renderer.print_info(&format!("temperature set to {:.2}", value));
                        }
                        ChatCommand::ClearTemperature => {
                            session.set_temperature(None);
                            renderer.print_info("temperature reset to model default");
                        }
                        ChatCommand::TopP(value) => {
                            session.set_top_p(Some(value));
                            renderer.print_info(&format!("top_p set to {:.2}", value));
                        }
                        ChatCommand::ClearTopP => {
                            session.set_top_p(None);
                            renderer.print_info("top_p reset to model default");
                        }
                        ChatCommand::TopK(value) => {
                            session.set_top_k(Some(value));
                            renderer.print_info(&format!("top_k set to {value}"));
                        }
                        ChatCommand::ClearTopK => {
                            session.set_top_k(None);
                            renderer.print_info("top_k reset to model default");
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to API
                println!("Gemini:");
                if let Err(e) = session.send_streaming(line, &mut renderer).await {
                    renderer.print_error(&e.to_string());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_catalog(session: &ChatSession) {
    println!("    Available models:");
    for info in catalog() {
        let marker = if &info.model == session.model() {
            "*"
        } else {
            " "
        };
        println!(
            "      {} {} - {} ({})",
            marker, info.model, info.display_name, info.description
        );
    }
    println!("      (any other model id can be set with /model <name>)");
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Messages: {}", stats.message_count);
    println!("      Max output tokens: {}", describe_u32(stats.max_output_tokens));
    println!("      Temperature: {}", describe_float(stats.temperature));
    println!("      Top-p: {}", describe_float(stats.top_p));
    println!("      Top-k: {}", describe_u32(stats.top_k));
    println!("      System instruction: {}", stats.system_instruction);
    match stats.pending_attachment {
        Some(mime) => println!("      Staged attachment: {}", mime),
        None => println!("      Staged attachment: (none)"),
    }
    println!(
        "      Total tokens: {} in / {} out ({} requests)",
        stats.total_prompt_tokens, stats.total_response_tokens, stats.total_requests
    );
    if let Some(prompt) = stats.last_turn_prompt_tokens {
        let response = stats.last_turn_response_tokens.unwrap_or(0);
        println!("      Last turn tokens: {prompt} in / {response} out");
    }
}

fn print_config(session: &ChatSession) {
    let stats = session.stats();
    println!("    Current Configuration:");
    println!("      Model: {}", stats.model);
    println!("      Max output tokens: {}", describe_u32(stats.max_output_tokens));
    println!("      Temperature: {}", describe_float(stats.temperature));
    println!("      Top-p: {}", describe_float(stats.top_p));
    println!("      Top-k: {}", describe_u32(stats.top_k));
    println!("      System instruction: {}", stats.system_instruction);
}

fn describe_float(value: Option<f32>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "default".to_string())
}

fn describe_u32(value: Option<u32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "default".to_string())
}
