//! Thành phần giao diện biểu đồ pipeline cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::styles;
    use pipeline_core::{
        color_for, companies_height_css, content_height_css, content_width_css, CategoryColor,
        LayoutBand, PhaseColumn, PipelineRecord, PipelineSettings, PipelineSnapshot, Viewport,
        BAND_HEIGHT, MAX_RENDERED_RECORDS,
    };
    use pipeline_dataview::{bundle_from_value, UpdateBundle};
    use serde_wasm_bindgen::{from_value, to_value};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{console, Document, Element, Event, HtmlElement, Window};
    use yew::prelude::*;
    use yew::AppHandle;

    #[derive(Properties, PartialEq)]
    pub struct PipelineViewProps {
        pub snapshot: PipelineSnapshot,
    }

    #[function_component(PipelineView)]
    fn pipeline_view(props: &PipelineViewProps) -> Html {
        let snapshot = &props.snapshot;

        let bar_ref = use_node_ref();
        let companies_ref = use_node_ref();
        let legend_ref = use_node_ref();

        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        // Đo chiều cao chú giải sau mỗi lần render rồi trừ vào vùng cuộn.
        {
            let companies_ref = companies_ref.clone();
            let legend_ref = legend_ref.clone();
            use_effect(move || {
                let legend_height = legend_ref
                    .cast::<HtmlElement>()
                    .map(|legend| f64::from(legend.offset_height()))
                    .unwrap_or(0.0);
                if let Some(companies) = companies_ref.cast::<HtmlElement>() {
                    if let Err(err) = companies
                        .style()
                        .set_property("height", &companies_height_css(legend_height))
                    {
                        console::error_1(&err);
                    }
                }
                || ()
            });
        }

        let on_scroll = {
            let bar_ref = bar_ref.clone();
            let companies_ref = companies_ref.clone();
            Callback::from(move |_: Event| {
                let Some(companies) = companies_ref.cast::<Element>() else {
                    return;
                };
                let Some(bar) = bar_ref.cast::<HtmlElement>() else {
                    return;
                };
                let offset = -companies.scroll_left();
                if let Err(err) = bar.style().set_property("left", &format!("{offset}px")) {
                    console::error_1(&err);
                }
            })
        };

        html! {
            <div class="pipeline-root">
                <header class="pipeline-header">
                    <h2 class="pipeline-title">{ snapshot.title.clone() }</h2>
                    { render_cap_note(snapshot) }
                </header>
                {
                    if snapshot.phases.is_empty() {
                        html! {
                            <p class="pipeline-empty">{"Chưa cấu hình danh sách phase cho biểu đồ."}</p>
                        }
                    } else {
                        html! {
                            <>
                                <div class="pipeline-bar-track">
                                    <div class="pipeline-bar" ref={bar_ref.clone()}>
                                        { for snapshot.phases.iter().map(render_phase_cell) }
                                    </div>
                                </div>
                                <div class="pipeline-companies" ref={companies_ref.clone()} onscroll={on_scroll}>
                                    { for snapshot.phases.iter().map(|column| render_phase_column(column, &snapshot.legend)) }
                                </div>
                            </>
                        }
                    }
                }
                <div class="pipeline-legend" ref={legend_ref.clone()}>
                    { for snapshot.legend.iter().map(render_legend_entry) }
                </div>
            </div>
        }
    }

    fn render_cap_note(snapshot: &PipelineSnapshot) -> Html {
        if !snapshot.truncated {
            return html! {};
        }

        html! {
            <p class="pipeline-cap-note">
                { format!("Hiển thị {MAX_RENDERED_RECORDS} trong tổng số {} bản ghi.", snapshot.total_records) }
            </p>
        }
    }

    fn render_phase_cell(column: &PhaseColumn) -> Html {
        html! {
            <div class="pipeline-phase">
                <span class="pipeline-phase-label">{ column.label.clone() }</span>
                <span class="pipeline-phase-count">{ column.records.len() }</span>
            </div>
        }
    }

    fn render_phase_column(column: &PhaseColumn, legend: &[CategoryColor]) -> Html {
        html! {
            <div class="pipeline-column">
                {
                    if column.records.is_empty() {
                        html! { <p class="pipeline-column-empty">{"Chưa có bản ghi"}</p> }
                    } else {
                        html! { for column.records.iter().map(|record| render_company(record, legend)) }
                    }
                }
            </div>
        }
    }

    fn render_company(record: &PipelineRecord, legend: &[CategoryColor]) -> Html {
        let color = color_for(legend, record.category.as_deref());
        let title = record.title.clone().unwrap_or_default();

        html! {
            <div class="pipeline-company" style={format!("border-left-color: {color}")}>
                <span class="pipeline-company-title" style={format!("color: {color}")}>{ title }</span>
                {
                    record
                        .name
                        .as_ref()
                        .map(|name| render_company_name(name, color))
                        .unwrap_or_default()
                }
            </div>
        }
    }

    fn render_company_name(name: &String, color: &str) -> Html {
        html! {
            <span class="pipeline-company-name" style={format!("color: {color}")}>{ name.clone() }</span>
        }
    }

    fn render_legend_entry(entry: &CategoryColor) -> Html {
        html! {
            <span class="pipeline-legend-item">
                <span class="pipeline-swatch" style={format!("background: {}", entry.color)}></span>
                <span class="pipeline-legend-label" style={format!("color: {}", entry.color)}>
                    { entry.category.clone() }
                </span>
            </span>
        }
    }

    /// Visual nhúng vào host: ba container xếp chồng (dải header, nội dung,
    /// dải footer) cùng vòng đời render đầy đủ.
    #[wasm_bindgen]
    pub struct PipelineVisual {
        document: Document,
        header_band: HtmlElement,
        content_root: HtmlElement,
        footer_band: HtmlElement,
        settings: PipelineSettings,
        host: Option<JsValue>,
        app: Option<AppHandle<PipelineView>>,
    }

    #[wasm_bindgen]
    impl PipelineVisual {
        #[wasm_bindgen(constructor)]
        pub fn new(mount: Element, host: JsValue) -> Result<PipelineVisual, JsValue> {
            let window: Window =
                web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
            let document: Document = window
                .document()
                .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

            styles::ensure_styles(&document)?;

            let header_band = create_div(&document, "pipeline-band pipeline-band-header")?;
            let content_root = create_div(&document, "pipeline-content")?;
            let footer_band = create_div(&document, "pipeline-band pipeline-band-footer")?;

            mount.append_child(&header_band)?;
            mount.append_child(&content_root)?;
            mount.append_child(&footer_band)?;

            let host = if host.is_null() || host.is_undefined() {
                None
            } else {
                Some(host)
            };

            Ok(PipelineVisual {
                document,
                header_band,
                content_root,
                footer_band,
                settings: PipelineSettings::default(),
                host,
                app: None,
            })
        }

        /// Nhận một update payload từ host và dựng lại toàn bộ biểu đồ.
        pub fn update(&mut self, payload: JsValue) -> Result<(), JsValue> {
            self.notify_started();

            match self.apply_update(payload) {
                Ok(()) => {
                    self.notify_finished();
                    Ok(())
                }
                Err(err) => {
                    let message = error_text(&err);
                    console::error_1(&err);
                    if let Err(render_err) = self.render_failure(&message) {
                        console::error_1(&render_err);
                    }
                    self.notify_failed(&message);
                    Err(err)
                }
            }
        }

        /// Danh sách (object, property, value) theo cấu hình của update gần nhất.
        #[wasm_bindgen(js_name = enumerateProperties)]
        pub fn enumerate_properties(&self, object_name: &str) -> Result<JsValue, JsValue> {
            to_value(&self.settings.enumerate_properties(object_name)).map_err(|err| {
                JsValue::from_str(&format!("Không serialize danh sách thuộc tính: {err}"))
            })
        }

        /// Gỡ biểu đồ khỏi DOM khi host hủy visual.
        pub fn destroy(&mut self) {
            if let Some(app) = self.app.take() {
                app.destroy();
            }
            self.header_band.remove();
            self.content_root.remove();
            self.footer_band.remove();
        }

        fn apply_update(&mut self, payload: JsValue) -> Result<(), JsValue> {
            let payload_value = from_value::<serde_json::Value>(payload)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON payload: {err}")))?;
            let bundle = bundle_from_value(&payload_value)
                .map_err(|err| JsValue::from_str(&format!("Pipeline error: {err}")))?;

            let UpdateBundle {
                viewport,
                settings,
                records,
            } = bundle;
            self.settings = settings;

            self.resize_content(viewport)?;
            self.refresh_bands()?;

            let snapshot = PipelineSnapshot::build(&self.settings, records);

            if let Some(app) = self.app.take() {
                app.destroy();
            }
            self.content_root.set_inner_html("");

            let app = yew::Renderer::<PipelineView>::with_root_and_props(
                self.content_root.clone().into(),
                PipelineViewProps { snapshot },
            )
            .render();
            self.app = Some(app);

            Ok(())
        }

        fn resize_content(&self, viewport: Viewport) -> Result<(), JsValue> {
            let style = self.content_root.style();
            style.set_property("width", &content_width_css(viewport))?;
            style.set_property("height", &content_height_css(viewport, self.settings.layout))?;
            Ok(())
        }

        fn refresh_bands(&self) -> Result<(), JsValue> {
            self.header_band.set_inner_html("");
            self.footer_band.set_inner_html("");
            self.header_band.style().set_property("height", "0px")?;
            self.footer_band.style().set_property("height", "0px")?;

            let band = match self.settings.layout {
                LayoutBand::None => return Ok(()),
                LayoutBand::Header => &self.header_band,
                LayoutBand::Footer => &self.footer_band,
            };

            band.style()
                .set_property("height", &format!("{BAND_HEIGHT}px"))?;

            if self.settings.image_url.is_empty() {
                return Ok(());
            }

            let image = self.document.create_element("img")?;
            image.set_attribute("class", "pipeline-band-image")?;
            image.set_attribute("src", &self.settings.image_url)?;
            image.set_attribute("alt", "")?;
            band.append_child(&image)?;

            Ok(())
        }

        fn render_failure(&mut self, message: &str) -> Result<(), JsValue> {
            if let Some(app) = self.app.take() {
                app.destroy();
            }
            self.content_root.set_inner_html("");

            let line = self.document.create_element("div")?;
            line.set_attribute("class", "pipeline-error")?;
            line.set_text_content(Some(message));
            self.content_root.append_child(&line)?;

            Ok(())
        }

        fn notify_started(&self) {
            self.call_host("renderingStarted", None);
        }

        fn notify_finished(&self) {
            self.call_host("renderingFinished", None);
        }

        fn notify_failed(&self, reason: &str) {
            self.call_host("renderingFailed", Some(reason));
        }

        // Host có thể bỏ trống từng callback; khi đó lời gọi là no-op.
        fn call_host(&self, method: &str, detail: Option<&str>) {
            let Some(host) = &self.host else {
                return;
            };

            let callback = js_sys::Reflect::get(host, &JsValue::from_str(method))
                .ok()
                .and_then(|value| value.dyn_into::<js_sys::Function>().ok());

            if let Some(func) = callback {
                let _ = match detail {
                    Some(text) => func.call1(host, &JsValue::from_str(text)),
                    None => func.call0(host),
                };
            }
        }
    }

    fn create_div(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
        let element = document.create_element("div")?;
        element.set_attribute("class", class)?;
        element.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }

    fn error_text(err: &JsValue) -> String {
        err.as_string().unwrap_or_else(|| format!("{err:?}"))
    }

    #[wasm_bindgen]
    pub fn mount_pipeline_visual(selector: &str, host: JsValue) -> Result<PipelineVisual, JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        PipelineVisual::new(target, host)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use gloo::timers::future::TimeoutFuture;
        use js_sys::Date;
        use wasm_bindgen_test::*;

        wasm_bindgen_test_configure!(run_in_browser);

        fn sample_snapshot() -> PipelineSnapshot {
            let settings = PipelineSettings {
                phases: "Seed".to_string(),
                ..PipelineSettings::default()
            };
            let records = vec![PipelineRecord {
                title: Some("Alpha Capital".to_string()),
                phase: Some("Seed".to_string()),
                category: Some("Fintech".to_string()),
                name: Some("Alpha Fund I".to_string()),
            }];
            PipelineSnapshot::build(&settings, records)
        }

        async fn wait_for(document: &Document, selector: &str) -> Element {
            let start = Date::now();
            loop {
                if let Ok(Some(element)) = document.query_selector(selector) {
                    return element;
                }
                if Date::now() - start > 5000.0 {
                    panic!("Không thấy {selector} sau 5s");
                }
                TimeoutFuture::new(10).await;
            }
        }

        #[wasm_bindgen_test]
        async fn company_title_and_name_carry_category_color() {
            let document = web_sys::window()
                .and_then(|window| window.document())
                .expect("Không truy cập được document");
            let root = document
                .create_element("div")
                .expect("Không tạo được root test");
            document
                .body()
                .expect("Không có body")
                .append_child(&root)
                .expect("Không gắn được root test");

            let snapshot = sample_snapshot();
            let expected = snapshot.legend[0].color.clone();
            let _app = yew::Renderer::<PipelineView>::with_root_and_props(
                root,
                PipelineViewProps { snapshot },
            )
            .render();

            let title = wait_for(&document, ".pipeline-company-title").await;
            let title_style = title.get_attribute("style").unwrap_or_default();
            assert!(
                title_style.contains(expected.as_str()),
                "style `{title_style}` thiếu màu {expected}"
            );

            let name = wait_for(&document, ".pipeline-company-name").await;
            let name_style = name.get_attribute("style").unwrap_or_default();
            assert!(
                name_style.contains(expected.as_str()),
                "style `{name_style}` thiếu màu {expected}"
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_pipeline_visual, PipelineVisual};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_pipeline_visual(
    _: &str,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "pipeline-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
