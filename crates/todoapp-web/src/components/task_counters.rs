use todoapp_core::Counters;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskCountersProps {
  pub counters: Counters
}

#[function_component(TaskCounters)]
pub fn task_counters(
  props: &TaskCountersProps
) -> Html {
  html! {
      <div class="counters">
          <span>{ "Completed: " }</span>
          <span id="completed-counter">{ props.counters.completed.to_string() }</span>
          <span>{ " Uncompleted: " }</span>
          <span id="uncompleted-counter">{ props.counters.incomplete.to_string() }</span>
      </div>
  }
}
