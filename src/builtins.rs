//! Built-in react service and plugin.
//!
//! The default project flavor: the service seeds the package manifest and
//! registers the react plugin; the plugin writes a starter source tree,
//! contributes the react dependencies and, at dev-server start, the bundler
//! settings a react project needs.

use serde_json::json;

use crate::error::Result;
use crate::inquiry::Question;
use crate::plugin::{PluginModule, ServiceModule};
use crate::registry::PluginRegistry;

pub const REACT_SERVICE: &str = "armature-service-react";
pub const REACT_PLUGIN: &str = "armature-plugin-react";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>{{ projectName }}</title>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

const INDEX_JS: &str = r#"import React from 'react';
import { createRoot } from 'react-dom/client';
import App from './App';

createRoot(document.getElementById('root')).render(<App />);
"#;

const APP_JS: &str = r#"import React from 'react';

const App = () => <h1>Welcome to {{ projectName }}</h1>;

export default App;
"#;

/// Registers the built-in service and plugin into `registry`.
pub fn register(registry: &mut PluginRegistry) {
    registry.register_service(REACT_SERVICE, react_service);
    registry.register_plugin(REACT_PLUGIN, react_plugin);
}

pub fn react_service() -> ServiceModule {
    ServiceModule::new(REACT_SERVICE, |ctx| {
        let project_name = ctx
            .inquiry_result
            .and_then(|answers| answers.get("projectName"))
            .and_then(|value| value.as_str())
            .unwrap_or(&ctx.create_options.project_name)
            .to_string();

        ctx.set_package_config(json!({
            "name": project_name,
            "version": "0.1.0",
            "private": true,
            "scripts": {
                "start": "armature start"
            }
        }));
        ctx.register_plugin("react", react_plugin());
        Ok(())
    })
    .with_inquiry(|options| {
        vec![
            Question::text("projectName", "Project name")
                .with_default(json!(options.project_name.clone())),
            Question::text("description", "Project description"),
        ]
    })
}

pub fn react_plugin() -> PluginModule {
    PluginModule::new(REACT_PLUGIN)
        .with_construction(|ctx| {
            let project_name = ctx
                .inquiry_result()
                .and_then(|answers| answers.get("projectName"))
                .and_then(|value| value.as_str())
                .unwrap_or("armature-app")
                .to_string();
            let render_context = json!({ "projectName": project_name });

            ctx.render_file("public/index.html", INDEX_HTML, &render_context)?;
            ctx.render_file("src/index.jsx", INDEX_JS, &render_context)?;
            ctx.render_file("src/App.jsx", APP_JS, &render_context)?;

            ctx.merge_package_config(json!({
                "dependencies": {
                    "react": "^18.2.0",
                    "react-dom": "^18.2.0"
                }
            }));
            Ok(())
        })
        .with_runtime(|ctx| {
            ctx.merge_webpack_config(json!({
                "entry": "./src/index.jsx",
                "resolve": {
                    "extensions": [".js", ".jsx"]
                }
            }));
            Ok(())
        })
        .with_script("lint", run_lint_script)
}

fn run_lint_script(ctx: &crate::plugin::ScriptContext<'_>) -> Result<()> {
    log::info!("Linting project in {}...", ctx.base_path.display());
    crate::ioutils::run_command("npx", &["eslint", "src"], ctx.base_path)
}
