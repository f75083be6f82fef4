//! A minimal compile-once text-templating engine.
//!
//! A [Template] is compiled from source containing literal text,
//! `{{ expr }}` substitutions, `{% if %}`/`{% for %}` blocks and `{# #}`
//! comments, then rendered any number of times against a [Context] of
//! named [Value] bindings. Expressions support dotted access (`user.name`)
//! resolved one step at a time at render time, and pipe filters
//! (`name | upper`) looked up in the context like any other variable.
//!
//! Compilation builds the render routine once; syntax problems fail
//! construction with a [SyntaxError], lookup problems fail individual
//! render calls with a [RenderError].
//!
//!
//! # Samples
//!
//! ## Hello world
//!
//! ```
//! use templite::{Template, Context, JsonValue};
//!
//! let text = "hello, {{you}}!";
//! let data = r#"{
//!     "you": "world"
//! }"#;
//!
//! let template = Template::from(text).unwrap();
//! let context = Context::from(&serde_json::from_str::<JsonValue>(data).unwrap());
//!
//! let result = template.render_with(&context).unwrap();
//!
//! assert_eq!(result, "hello, world!")
//! ```
//!
//! ## Hello team
//!
//! ```
//! use templite::{Template, Context, YamlValue};
//! let text = "{% for member in team %}hello, {{ member.name }}!\n{% endfor %}";
//! let data = r#"
//!   team:
//!     - name: john
//!     - name: jane
//! "#;
//!
//! let template = Template::from(text).unwrap();
//! let context = Context::from(&serde_yaml::from_str::<YamlValue>(data).unwrap());
//!
//! let result = template.render_with(&context).unwrap();
//! assert_eq!(result, "hello, john!\nhello, jane!\n");
//! ```
//!
//! ## Filters
//!
//! ```
//! use templite::{Template, Context, Value};
//!
//! let mut context = Context::new();
//! context.set("upper", Value::filter(|v| Value::Text(v.to_text().to_uppercase())));
//!
//! let template = Template::with_context("<h1>Hello {{name|upper}}!</h1>", &[context]).unwrap();
//!
//! let mut data = Context::new();
//! data.set("name", Value::text("ned"));
//! assert_eq!(template.render_with(&data).unwrap(), "<h1>Hello NED!</h1>");
//! ```
mod template;
mod reader;
mod expr;
mod builder;
mod program;
mod context;
mod json;
mod yaml;
mod error;

pub use self::template::Template;
pub use self::context::{Context, Value};
pub use self::error::{RenderError, SyntaxError};
pub use self::json::JsonValue;
pub use self::yaml::YamlValue;
