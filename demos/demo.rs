use core::default::Default;
use glam::{vec2, Vec2};
use miniquad::{
    conf, BlendFactor, BlendState, BlendValue, BufferLayout, Context, Equation, EventHandler,
    PassAction, Pipeline, PipelineParams, Shader, ShaderMeta, UniformBlockLayout, UserData,
    VertexAttribute, VertexFormat,
};
use std::f32::consts::PI;
use stripline::{
    map_points_to_device, subpath_break, tessellate_stroke, EndcapStyle, JoinStyle, MiniquadStrip,
    StrokeOptions, VertexPos2Color,
};

struct Demo {
    start_time: f64,
    batch: MiniquadStrip<VertexPos2Color>,
    pipeline: Pipeline,
    window_size: [f32; 2],
}

impl Demo {
    pub fn new(context: &mut Context) -> Demo {
        Demo {
            start_time: miniquad::date::now(),
            batch: MiniquadStrip::new(),
            pipeline: Demo::create_pipeline(context),
            window_size: [1280.0, 720.0],
        }
    }

    fn create_pipeline(ctx: &mut Context) -> Pipeline {
        // Positions arrive already mapped to device space on the CPU.
        let vertex_shader = r#"#version 100
            attribute vec2 pos;
            attribute vec4 color;
            varying lowp vec4 v_color;
            void main() {
                gl_Position = vec4(pos, 0, 1);
                v_color = color / 255.0;
            }"#;
        let fragment_shader = r#"#version 100
            varying lowp vec4 v_color;
            void main() {
                gl_FragColor = v_color;
            }"#;
        let shader = Shader::new(
            ctx,
            vertex_shader,
            fragment_shader,
            ShaderMeta {
                images: vec![],
                uniforms: UniformBlockLayout { uniforms: vec![] },
            },
        )
        .unwrap();

        Pipeline::with_params(
            ctx,
            &[BufferLayout::default()],
            &[
                VertexAttribute::new("pos", VertexFormat::Float2),
                VertexAttribute::new("color", VertexFormat::Byte4),
            ],
            shader,
            PipelineParams {
                alpha_blend: Some(BlendState::new(
                    Equation::Add,
                    BlendFactor::Value(BlendValue::SourceAlpha),
                    BlendFactor::OneMinusValue(BlendValue::SourceAlpha),
                )),
                color_blend: Some(BlendState::new(
                    Equation::Add,
                    BlendFactor::Value(BlendValue::SourceAlpha),
                    BlendFactor::OneMinusValue(BlendValue::SourceAlpha),
                )),
                ..Default::default()
            },
        )
    }

    fn stroke(&mut self, points: &[Vec2], options: &StrokeOptions, color: [u8; 4]) {
        let [w, h] = self.window_size;
        let mut strip = tessellate_stroke(points, options).unwrap();
        map_points_to_device(&mut strip, 2.0 / w, -2.0 / h);
        self.batch.add_strip(&strip, color);
    }
}

fn zigzag(offset: Vec2) -> Vec<Vec2> {
    [
        vec2(0.0, 40.0),
        vec2(40.0, 0.0),
        vec2(80.0, 40.0),
        vec2(120.0, 0.0),
        vec2(160.0, 40.0),
        vec2(200.0, 25.0),
    ]
    .iter()
    .map(|p| *p + offset)
    .collect()
}

fn star(center: Vec2, radius: f32, phase: f32) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(11);
    for i in 0..11 {
        let angle = phase + i as f32 * 2.0 * PI / 10.0;
        let r = if i % 2 == 0 { radius } else { radius * 0.45 };
        points.push(center + vec2(angle.cos(), angle.sin()) * r);
    }
    points
}

impl EventHandler for Demo {
    fn draw(&mut self, context: &mut Context) {
        let time = (miniquad::date::now() - self.start_time) as f32;
        context.begin_default_pass(PassAction::Clear {
            color: Some((0.15, 0.15, 0.15, 1.0)),
            depth: None,
            stencil: None,
        });

        self.batch.begin_frame();
        self.batch.clear();

        let [w, h] = self.window_size;

        // join styles on the same zigzag
        let joins = [
            (JoinStyle::Bevel, [255, 160, 80, 255]),
            (JoinStyle::Round, [120, 220, 120, 255]),
            (JoinStyle::Miter, [120, 170, 255, 255]),
            (JoinStyle::MiterOrBevel, [240, 120, 180, 255]),
        ];
        for (i, &(join, color)) in joins.iter().enumerate() {
            let offset = vec2(w * 0.08, h * 0.1 + i as f32 * 70.0);
            let options = StrokeOptions::with_thickness(7.0).join(join, 0.3);
            self.stroke(&zigzag(offset), &options, color);
        }

        // butt against round caps
        for (i, &(endcap, resolution)) in
            [(EndcapStyle::Butt, 0.3), (EndcapStyle::Round, 0.2)].iter().enumerate()
        {
            let y = h * 0.15 + i as f32 * 60.0;
            let points = [vec2(w * 0.38, y), vec2(w * 0.55, y + 20.0)];
            let options = StrokeOptions::with_thickness(10.0).endcap(endcap, resolution);
            self.stroke(&points, &options, [230, 230, 230, 255]);
        }

        // one buffer, three subpaths
        let dashes = [
            vec2(w * 0.38, h * 0.45),
            vec2(w * 0.45, h * 0.42),
            subpath_break(),
            vec2(w * 0.47, h * 0.42),
            vec2(w * 0.54, h * 0.45),
            subpath_break(),
            vec2(w * 0.56, h * 0.45),
            vec2(w * 0.60, h * 0.50),
        ];
        let options = StrokeOptions::with_thickness(5.0).endcap(EndcapStyle::Round, 0.25);
        self.stroke(&dashes, &options, [255, 220, 90, 255]);

        // spinning star, round everything
        let center = vec2(w * 0.78, h * 0.5);
        let mut points = star(center, h * 0.3, time * 0.3);
        points.push(points[0]);
        let options = StrokeOptions::with_thickness(6.0)
            .endcap(EndcapStyle::Round, 0.2)
            .join(JoinStyle::Round, 0.2);
        self.stroke(&points, &options, [140, 200, 255, 255]);

        context.apply_pipeline(&self.pipeline);
        self.batch.draw(context);

        context.end_render_pass();
        context.commit_frame();
    }

    fn update(&mut self, _context: &mut Context) {}

    fn resize_event(&mut self, _context: &mut Context, width: f32, height: f32) {
        self.window_size = [width, height];
    }
}

fn main() {
    miniquad::start(
        conf::Conf {
            sample_count: 0,
            window_width: 1280,
            window_height: 720,
            ..Default::default()
        },
        |mut context| UserData::owning(Demo::new(&mut context), context),
    );
}
