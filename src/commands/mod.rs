use pasint_core::{CoreError, Response};

pub mod run;
pub mod repl;

/// Text printed for a successful response. JSON mode emits one object per
/// response; text mode prints values the way a Pascal listing would.
pub fn render(response: &Response, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string(response);
    }

    Ok(match response {
        Response::Variables(vars) => vars.to_string().trim_end().to_string(),
        Response::Value(value) => value.to_string(),
        Response::Tokens(tokens) => tokens.join("\n"),
        Response::Syntax(text) => text.clone(),
        Response::Error(err) => err.to_string(),
    })
}

pub fn into_result(response: Response) -> Result<Response, CoreError> {
    match response {
        Response::Error(err) => Err(err),
        other => Ok(other),
    }
}
