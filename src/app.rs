use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::HttpChatApi;
use crate::components::{Composer, SessionSidebar, Transcript};
use crate::config::ApiConfig;
use crate::controller::ChatController;
use crate::types::SessionId;

const SPINNER_CSS: &str = "@keyframes spin { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }";

#[derive(Properties, PartialEq)]
pub struct ChatAppProps {
    #[prop_or_default]
    pub config: ApiConfig,
}

#[function_component(ChatApp)]
pub fn chat_app(props: &ChatAppProps) -> Html {
    let trigger = use_force_update();
    let controller = use_memo(props.config.clone(), move |config| {
        ChatController::new(
            HttpChatApi::new(config.clone()),
            Callback::from(move |_| trigger.force_update()),
        )
    });

    // Load the session list on mount; stop applying responses once unmounted.
    {
        let controller = controller.clone();
        use_effect_with(props.config.clone(), move |_| {
            let task = controller.clone();
            spawn_local(async move {
                task.fetch_available_sessions().await;
            });
            move || controller.detach()
        });
    }

    let on_new_session = {
        let controller = controller.clone();
        Callback::from(move |_: ()| {
            controller.start_new_session();
        })
    };

    let on_select = {
        let controller = controller.clone();
        Callback::from(move |session_id: SessionId| {
            let controller = controller.clone();
            spawn_local(async move {
                controller.select_session(session_id).await;
            });
        })
    };

    let on_refresh = {
        let controller = controller.clone();
        Callback::from(move |_: ()| {
            let controller = controller.clone();
            spawn_local(async move {
                controller.fetch_available_sessions().await;
            });
        })
    };

    let on_dismiss_notice = {
        let controller = controller.clone();
        Callback::from(move |_: ()| controller.dismiss_notice())
    };

    let on_input = {
        let controller = controller.clone();
        Callback::from(move |text: String| controller.set_input(text))
    };

    let on_send = {
        let controller = controller.clone();
        Callback::from(move |_: ()| {
            let controller = controller.clone();
            spawn_local(async move {
                controller.send_message().await;
            });
        })
    };

    let state = controller.state();

    html! {
        <div style="display:flex; flex-direction:row; height:100vh; font-family:Arial,sans-serif;">
            <style>{ SPINNER_CSS }</style>
            <SessionSidebar
                sessions={state.sessions().to_vec()}
                active={state.active_session().cloned()}
                loading={state.sessions_loading()}
                notice={state.notice().map(str::to_string)}
                {on_new_session}
                {on_select}
                {on_refresh}
                {on_dismiss_notice}
            />
            <div style="flex:1; display:flex; flex-direction:column; min-width:0;">
                <Transcript entries={state.transcript().to_vec()} />
                <Composer
                    value={state.input().to_string()}
                    disabled={!state.can_send()}
                    {on_input}
                    {on_send}
                />
            </div>
        </div>
    }
}
