//! Email templates and their variables.
//!
//! Each template has its own variables struct with an explicit conversion into
//! [`TemplateVars`]; placeholders in the body are written `{{key}}`.

/// Templates the service can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    OneTimePassword,
}

impl EmailTemplate {
    pub fn id(self) -> &'static str {
        match self {
            Self::OneTimePassword => "one_time_password",
        }
    }

    pub fn subject(self) -> &'static str {
        match self {
            Self::OneTimePassword => "Jupiter Perp Trader - One-Time Password",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Self::OneTimePassword => ONE_TIME_PASSWORD_HTML,
        }
    }

    /// Substitute every `{{key}}` placeholder with its value.
    pub fn render(self, vars: &TemplateVars) -> String {
        vars.0
            .iter()
            .fold(self.body().to_owned(), |html, (key, value)| {
                html.replace(&format!("{{{{{key}}}}}"), value)
            })
    }
}

const ONE_TIME_PASSWORD_HTML: &str = r#"<html>
	<head>
		<title>Jupiter Perp Trader - One-Time Password</title>
		<meta name="viewport" content="width=device-width, initial-scale=1.0">
		<style>
			body {
				font-family: Arial, sans-serif;
				background-color: #f4f4f4;
			}
		</style>
	</head>
	<body>
		<h1>Jupiter Perp Trader - One-Time Password</h1>
		<p>Your one-time password is: {{code}}</p>
	</body>
</html>
"#;

/// Key/value pairs substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars(pub Vec<(&'static str, String)>);

/// Variables of [`EmailTemplate::OneTimePassword`].
#[derive(Debug, Clone)]
pub struct OneTimePasswordVars {
    pub code: String,
}

impl From<OneTimePasswordVars> for TemplateVars {
    fn from(vars: OneTimePasswordVars) -> Self {
        Self(vec![("code", vars.code)])
    }
}
