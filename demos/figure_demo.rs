use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};

use plotcanvas::{Color, Figure, FigureConfig, GpuiFigureView, LineStyle, MarkerSize, MarkerStyle};

fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(960.0), px(560.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let (mut figure, ids) =
                Figure::subplots(1, 2, FigureConfig::default()).expect("figure layout");

            let x: Vec<f64> = (0..400).map(|i| i as f64 * 0.03).collect();
            let left = figure.surface_mut(ids[0]).expect("left surface");
            left.plot(x.clone(), x.iter().map(|v| v.sin()).collect::<Vec<_>>())
                .expect("sine");
            left.plot_styled(
                x.clone(),
                x.iter().map(|v| 0.5 * (2.0 * v).cos()).collect::<Vec<_>>(),
                LineStyle {
                    color: Color::from_rgb_u32(0xd62728),
                    width: 1.0,
                },
            )
            .expect("cosine");
            left.set_xlabel("time [s]");
            left.set_ylabel("amplitude");

            let right = figure.surface_mut(ids[1]).expect("right surface");
            let sx: Vec<f64> = (0..60).map(|i| (i as f64 * 0.37).sin() * 4.0).collect();
            let py: Vec<f64> = (0..60).map(|i| (i as f64 * 0.23).cos() * 2.0).collect();
            right
                .scatter_styled(
                    &sx,
                    &py,
                    MarkerStyle {
                        fill: Color::from_rgb_u32(0x2ca02c),
                        edge: Some(Color::BLACK),
                        size: MarkerSize::Uniform(4.0),
                    },
                )
                .expect("scatter");
            right.set_xlabel("x");
            right.set_ylabel("y");

            let view = GpuiFigureView::new(figure);
            cx.new(|_| view)
        })
        .unwrap();
    });
}
