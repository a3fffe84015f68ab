//! Chat and tool-calling round trip against Workers AI
//!
//! Requires `CLOUDFLARE_ACCOUNT_ID` and `CLOUDFLARE_AUTH_TOKEN`.
//! Set `WORKERS_AI_DEBUG=true` and `RUST_LOG=debug` to see request and response bodies.
//!
//! Run with: `cargo run --example chat`

use serde::Deserialize;
use workers_ai::{Client, Message, ModelParameters, Parameter, models, tool};

#[derive(Deserialize)]
struct WeatherArgs {
    location: String,
    #[serde(default)]
    unit: Option<String>,
}

fn get_weather(args: &WeatherArgs) -> serde_json::Value {
    let unit = args.unit.as_deref().unwrap_or("celsius");
    serde_json::json!({
        "location": args.location,
        "temperature": if unit == "fahrenheit" { 64 } else { 18 },
        "unit": unit,
        "conditions": "partly cloudy"
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let client = Client::from_env()?;

    // Plain chat
    println!("=== Chat ===");
    let response = client
        .chat(
            models::LLAMA_3_8B,
            &[
                Message::system("You are a helpful assistant. Answer in one sentence."),
                Message::user("How do you say pineapple in Portuguese?"),
            ],
            Some(&ModelParameters::new().with_max_tokens(128)),
        )
        .await?;
    println!("[{}] {}", response.format(), response.content());

    // Tool calling
    println!("\n=== Tool calling ===");
    let weather = tool("get_weather", "Get the current weather in a given location")
        .param_with(
            "location",
            Parameter::new("string").with_description("The city and country, e.g. Eindhoven, NL"),
        )
        .optional_param_with(
            "unit",
            Parameter::new("string").with_enum(["celsius", "fahrenheit"]),
        )
        .build();
    let tools = vec![weather];

    let mut history = vec![
        Message::system("You are a helpful assistant with access to a weather tool."),
        Message::user("What is the weather like in Eindhoven?"),
    ];

    let response = client
        .chat_with_tools(models::LLAMA_4_SCOUT_17B, &history, &tools, None)
        .await?;
    println!("Detected format: {}", response.format());

    let calls = response.tool_calls();
    if calls.is_empty() {
        println!("Model answered directly: {}", response.content());
        return Ok(());
    }

    history.push(Message::tool_calls(calls.clone()));
    for call in calls.iter() {
        println!("Tool call {}: {}({})", call.id, call.name(), call.arguments());
        let args: WeatherArgs = call.parse_arguments()?;
        history.push(Message::tool_result(
            call.id.clone(),
            get_weather(&args).to_string(),
        ));
    }

    let final_response = client
        .chat_with_tools(models::LLAMA_4_SCOUT_17B, &history, &tools, None)
        .await?;
    println!("Final answer: {}", final_response.content());

    let usage = final_response.usage();
    println!(
        "Tokens: {} prompt + {} completion = {}",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    );

    Ok(())
}
